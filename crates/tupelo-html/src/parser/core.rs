use strum_macros::Display;

use tupelo_dom::{
    Attribute as DomAttribute, DomTree, ElementData, Namespace, NodeId, NodeType, QuirksMode,
};

use super::foreign_content::{
    adjust_mathml_attributes, adjust_svg_attributes, adjust_svg_tag_name,
    foreign_attribute_namespace, is_html_integration_point, is_mathml_text_integration_point,
    BREAKOUT_TAGS,
};
use super::quirks::quirks_mode_from_doctype;
use crate::error::{ErrorCode, FragmentContextError, ParseError};
use crate::tokenizer::{Attribute, HTMLTokenizer, Token, TokenizerState};

/// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
///
/// "The insertion mode is a state variable that controls the primary operation
/// of the tree construction stage."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum InsertionMode {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    Initial,
    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    BeforeHtml,
    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    BeforeHead,
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    InHead,
    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    InHeadNoscript,
    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    AfterHead,
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    InBody,
    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    Text,
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    InTable,
    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    InTableText,
    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    InCaption,
    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolumngroup)
    InColumnGroup,
    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intablebody)
    InTableBody,
    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inrow)
    InRow,
    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incell)
    InCell,
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    InSelect,
    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    InSelectInTable,
    /// [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)
    InTemplate,
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    AfterBody,
    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    InFrameset,
    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    AfterFrameset,
    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    AfterAfterBody,
    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    AfterAfterFrameset,
}

/// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
///
/// "The list of active formatting elements... is used to handle mis-nested
/// formatting element tags."
///
/// The list contains entries that are either elements or markers.
#[derive(Debug, Clone)]
enum ActiveFormattingElement {
    /// A formatting element entry.
    ///
    /// Formatting elements are: a, b, big, code, em, font, i, nobr, s, small,
    /// strike, strong, tt, u.
    Element {
        /// The `NodeId` of the element in the DOM tree.
        node_id: NodeId,
        /// The original start tag token, kept so the element can be recreated
        /// during the adoption agency algorithm or when reconstructing.
        token: Token,
    },
    /// A marker entry.
    ///
    /// "A marker is an entry in the list of active formatting elements that is
    /// distinct from any element."
    ///
    /// Markers are pushed when entering applet, object, marquee, template,
    /// td, th, and caption elements, so that formatting elements from outside
    /// do not leak into their content.
    Marker,
}

/// Tag names every HTML fragment context must come from.
///
/// [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
///
/// Foreign (SVG/MathML) contexts accept any name, since those vocabularies
/// are open-ended from the parser's point of view.
const KNOWN_HTML_TAGS: &[&str] = &[
    "a", "abbr", "address", "applet", "area", "article", "aside", "audio", "b", "base",
    "basefont", "bdi", "bdo", "bgsound", "big", "blockquote", "body", "br", "button", "canvas",
    "caption", "center", "cite", "code", "col", "colgroup", "data", "datalist", "dd", "del",
    "details", "dfn", "dialog", "dir", "div", "dl", "dt", "em", "embed", "fieldset",
    "figcaption", "figure", "font", "footer", "form", "frame", "frameset", "h1", "h2", "h3",
    "h4", "h5", "h6", "head", "header", "hgroup", "hr", "html", "i", "iframe", "img", "input",
    "ins", "kbd", "keygen", "label", "legend", "li", "link", "listing", "main", "map", "mark",
    "marquee", "menu", "meta", "meter", "nav", "nobr", "noembed", "noframes", "noscript",
    "object", "ol", "optgroup", "option", "output", "p", "param", "picture", "plaintext",
    "pre", "progress", "q", "rb", "rp", "rt", "rtc", "ruby", "s", "samp", "script", "search",
    "section", "select", "slot", "small", "source", "span", "strike", "strong", "style", "sub",
    "summary", "sup", "table", "tbody", "td", "template", "textarea", "tfoot", "th", "thead",
    "time", "title", "tr", "track", "tt", "u", "ul", "var", "video", "wbr", "xmp",
];

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// The tree construction stage. Pulls tokens from the tokenizer one at a
/// time, dispatches each per the current insertion mode (or the foreign
/// content rules), and builds the DOM tree in the arena.
pub struct HTMLParser {
    /// The tokenization stage, driven by this parser. Owning it lets the
    /// tree constructor switch tokenizer states between tokens (RCDATA,
    /// RAWTEXT, script data, PLAINTEXT) as the markup requires.
    tokenizer: HTMLTokenizer,

    /// DOM tree with parent/sibling pointers.
    /// `NodeId::ROOT` (index 0) is the Document node.
    tree: DomTree,

    /// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
    insertion_mode: InsertionMode,

    /// [§ 13.2.4.1 The original insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#original-insertion-mode)
    original_insertion_mode: Option<InsertionMode>,

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#stack-of-template-insertion-modes)
    ///
    /// "The stack of template insertion modes... is used to handle the case
    /// where HTML templates contain table content."
    template_insertion_modes: Vec<InsertionMode>,

    /// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    ///
    /// Stores `NodeId`s into the arena.
    stack_of_open_elements: Vec<NodeId>,

    /// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
    active_formatting_elements: Vec<ActiveFormattingElement>,

    /// [§ 13.2.4.4 The element pointers](https://html.spec.whatwg.org/multipage/parsing.html#the-element-pointers)
    head_element_pointer: Option<NodeId>,

    /// [§ 13.2.4.4](https://html.spec.whatwg.org/multipage/parsing.html#form-element-pointer)
    ///
    /// "The form element pointer points to the last form element that was
    /// opened and whose end tag has not yet been seen."
    form_element_pointer: Option<NodeId>,

    /// [§ 13.2.6.1 Foster parenting](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    foster_parenting: bool,

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#frameset-ok-flag)
    ///
    /// "The frameset-ok flag is set to 'ok' when the parser is created. It is
    /// set to 'not ok' after certain tokens are seen."
    frameset_ok: bool,

    /// [§ 13.2.6.4.10](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    ///
    /// "The pending table character tokens list"
    pending_table_character_tokens: Vec<Token>,

    /// Set after pre, listing, and textarea start tags: "if the next token is
    /// a U+000A LINE FEED (LF) character token, then ignore that token".
    ignore_next_lf: bool,

    /// The detached context element when parsing a fragment, `None` for a
    /// full document parse.
    ///
    /// [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
    fragment_context: Option<NodeId>,

    /// Whether the "stop parsing" steps have run.
    stopped: bool,

    /// Tree construction parse errors, merged with the tokenizer's at the
    /// end of the parse.
    errors: Vec<ParseError>,
}

impl HTMLParser {
    /// Create a parser for a full document.
    #[must_use]
    pub fn new(input: &[u8]) -> Self {
        // DomTree::new() creates the Document node at NodeId::ROOT.
        Self {
            tokenizer: HTMLTokenizer::new(input),
            tree: DomTree::new(),
            insertion_mode: InsertionMode::Initial,
            original_insertion_mode: None,
            template_insertion_modes: Vec::new(),
            stack_of_open_elements: Vec::new(),
            active_formatting_elements: Vec::new(),
            head_element_pointer: None,
            form_element_pointer: None,
            foster_parenting: false,
            frameset_ok: true,
            pending_table_character_tokens: Vec::new(),
            ignore_next_lf: false,
            fragment_context: None,
            stopped: false,
            errors: Vec::new(),
        }
    }

    /// [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
    ///
    /// Create a parser for a fragment with the given context element.
    ///
    /// "Create a new Document node... If there is a context element, ...
    /// Set the state of the HTML parser's tokenization stage as follows,
    /// switching on the context element... Let root be a new html element
    /// with no attributes. Append the element root to the Document node...
    /// Set up the parser's stack of open elements so that it contains just
    /// the single element root... Reset the parser's insertion mode
    /// appropriately."
    ///
    /// # Errors
    ///
    /// Returns [`FragmentContextError::UnknownContextTag`] when the context
    /// tag is not a recognized HTML element name (foreign contexts accept
    /// any non-empty name).
    pub fn new_fragment(
        input: &[u8],
        context_tag: &str,
        context_namespace: Namespace,
    ) -> Result<Self, FragmentContextError> {
        let recognized = match context_namespace {
            Namespace::Html => KNOWN_HTML_TAGS.contains(&context_tag),
            Namespace::MathMl | Namespace::Svg => {
                !context_tag.is_empty() && context_tag.is_ascii()
            }
        };
        if !recognized {
            return Err(FragmentContextError::UnknownContextTag {
                tag: context_tag.to_string(),
            });
        }

        let mut parser = Self::new(input);

        // The context element never joins the tree; it only participates in
        // the "adjusted current node" and reset-insertion-mode computations.
        let context_id = parser.tree.alloc(
            NodeType::Element(ElementData::new(
                context_tag.to_string(),
                context_namespace,
            )),
            0,
        );
        parser.fragment_context = Some(context_id);

        // "Set the state of the HTML parser's tokenization stage as follows,
        //  switching on the context element."
        if context_namespace == Namespace::Html {
            match context_tag {
                "title" | "textarea" => parser.tokenizer.set_state(TokenizerState::RCDATA),
                "style" | "xmp" | "iframe" | "noembed" | "noframes" | "noscript" => {
                    parser.tokenizer.set_state(TokenizerState::RAWTEXT);
                }
                "script" => parser.tokenizer.set_state(TokenizerState::ScriptData),
                "plaintext" => parser.tokenizer.set_state(TokenizerState::PLAINTEXT),
                _ => {}
            }
        }
        parser.tokenizer.set_last_start_tag_name(context_tag);

        // "Let root be a new html element with no attributes. Append the
        //  element root to the Document node."
        let root = parser.tree.alloc(
            NodeType::Element(ElementData::new("html".to_string(), Namespace::Html)),
            0,
        );
        parser.tree.append_child(NodeId::ROOT, root);

        // "Set up the parser's stack of open elements so that it contains
        //  just the single element root."
        parser.stack_of_open_elements.push(root);

        // "If the context element is a template element, push 'in template'
        //  onto the stack of template insertion modes."
        if context_namespace == Namespace::Html && context_tag == "template" {
            parser
                .template_insertion_modes
                .push(InsertionMode::InTemplate);
        }

        // "Reset the parser's insertion mode appropriately."
        parser.reset_insertion_mode_appropriately();

        parser.sync_tokenizer_foreign_flag();
        Ok(parser)
    }

    /// Run the parse to completion, returning the tree and all parse errors
    /// (tokenizer and tree construction) ordered by byte offset.
    #[must_use]
    pub fn run(mut self) -> (DomTree, Vec<ParseError>) {
        loop {
            let token = self.tokenizer.next_token();

            // "If the next token is a U+000A LINE FEED (LF) character token,
            //  then ignore that token" (pre, listing, textarea).
            if self.ignore_next_lf {
                self.ignore_next_lf = false;
                if matches!(token, Token::Character { data: '\n', .. }) {
                    continue;
                }
            }

            self.dispatch(&token);
            self.sync_tokenizer_foreign_flag();

            if token.is_eof() || self.stopped {
                break;
            }
        }
        self.finish()
    }

    /// [§ 13.2.7 The end](https://html.spec.whatwg.org/multipage/parsing.html#the-end)
    ///
    /// Classify all-whitespace text runs, merge the two error streams, and
    /// hand the tree to the caller.
    fn finish(mut self) -> (DomTree, Vec<ParseError>) {
        let text_nodes: Vec<NodeId> = self
            .tree
            .descendants(NodeId::ROOT)
            .filter(|&id| {
                matches!(
                    self.tree.get(id).map(|n| &n.node_type),
                    Some(NodeType::Text(_))
                )
            })
            .collect();
        for id in text_nodes {
            if let Some(node) = self.tree.get_mut(id)
                && let NodeType::Text(data) = &node.node_type
                && !data.is_empty()
                && data.chars().all(|c| c.is_ascii_whitespace())
            {
                let data = data.clone();
                node.node_type = NodeType::Whitespace(data);
            }
        }

        let mut errors = self.tokenizer.take_errors();
        errors.append(&mut self.errors);
        errors.sort_by_key(|error| error.offset);
        (self.tree, errors)
    }

    /// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction-dispatcher)
    ///
    /// "As each token is emitted from the tokenizer, the user agent must
    /// follow the appropriate steps from the following list, known as the
    /// tree construction dispatcher."
    fn dispatch(&mut self, token: &Token) {
        if self.dispatch_to_html_rules(token) {
            self.process_token(token);
        } else {
            self.process_token_in_foreign_content(token);
        }
    }

    /// "If the stack of open elements is empty; If the adjusted current node
    /// is an element in the HTML namespace; ... Process the token according
    /// to the rules given in the section corresponding to the current
    /// insertion mode in HTML content. Otherwise: Process the token
    /// according to the rules given in the section for parsing tokens in
    /// foreign content."
    fn dispatch_to_html_rules(&self, token: &Token) -> bool {
        let Some(adjusted) = self.adjusted_current_node() else {
            return true;
        };
        let Some(element) = self.tree.as_element(adjusted) else {
            return true;
        };

        // "If the adjusted current node is an element in the HTML namespace"
        if element.namespace == Namespace::Html {
            return true;
        }

        // "If the adjusted current node is a MathML text integration point
        //  and the token is a start tag whose tag name is neither 'mglyph'
        //  nor 'malignmark' [or] a character token"
        if is_mathml_text_integration_point(element) {
            match token {
                Token::StartTag { name, .. } if name != "mglyph" && name != "malignmark" => {
                    return true;
                }
                Token::Character { .. } => return true,
                _ => {}
            }
        }

        // "If the adjusted current node is a MathML annotation-xml element
        //  and the token is a start tag whose tag name is 'svg'"
        if element.namespace == Namespace::MathMl
            && element.tag_name == "annotation-xml"
            && matches!(token, Token::StartTag { name, .. } if name == "svg")
        {
            return true;
        }

        // "If the adjusted current node is an HTML integration point and the
        //  token is a start tag [or] a character token"
        if is_html_integration_point(element)
            && matches!(token, Token::StartTag { .. } | Token::Character { .. })
        {
            return true;
        }

        // "If the token is an end-of-file token"
        token.is_eof()
    }

    /// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
    ///
    /// Process a token per the current insertion mode.
    fn process_token(&mut self, token: &Token) {
        // CDATA section characters only arise in foreign content; by the
        // time the regular HTML rules see one (integration points), it
        // behaves as an ordinary character token.
        if let Token::Cdata { data, offset } = token {
            let character = Token::Character {
                data: *data,
                offset: *offset,
            };
            self.process_token(&character);
            return;
        }

        match self.insertion_mode {
            InsertionMode::Initial => self.handle_initial_mode(token),
            InsertionMode::BeforeHtml => self.handle_before_html_mode(token),
            InsertionMode::BeforeHead => self.handle_before_head_mode(token),
            InsertionMode::InHead => self.handle_in_head_mode(token),
            InsertionMode::InHeadNoscript => self.handle_in_head_noscript_mode(token),
            InsertionMode::AfterHead => self.handle_after_head_mode(token),
            InsertionMode::InBody => self.handle_in_body_mode(token),
            InsertionMode::Text => self.handle_text_mode(token),
            InsertionMode::InTable => self.handle_in_table_mode(token),
            InsertionMode::InTableText => self.handle_in_table_text_mode(token),
            InsertionMode::InCaption => self.handle_in_caption_mode(token),
            InsertionMode::InColumnGroup => self.handle_in_column_group_mode(token),
            InsertionMode::InTableBody => self.handle_in_table_body_mode(token),
            InsertionMode::InRow => self.handle_in_row_mode(token),
            InsertionMode::InCell => self.handle_in_cell_mode(token),
            InsertionMode::InSelect => self.handle_in_select_mode(token),
            InsertionMode::InSelectInTable => self.handle_in_select_in_table_mode(token),
            InsertionMode::InTemplate => self.handle_in_template_mode(token),
            InsertionMode::AfterBody => self.handle_after_body_mode(token),
            InsertionMode::InFrameset => self.handle_in_frameset_mode(token),
            InsertionMode::AfterFrameset => self.handle_after_frameset_mode(token),
            InsertionMode::AfterAfterBody => self.handle_after_after_body_mode(token),
            InsertionMode::AfterAfterFrameset => self.handle_after_after_frameset_mode(token),
        }
    }

    /// "Reprocess the token" — process the same token again after an
    /// insertion mode switch. Goes back through the dispatcher so that mode
    /// switches into or out of foreign content take effect.
    fn reprocess_token(&mut self, token: &Token) {
        self.dispatch(token);
    }

    /// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
    fn parse_error(&mut self, code: ErrorCode, offset: usize) {
        self.errors.push(ParseError::new(code, offset));
    }

    /// [§ 12.1.4 ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
    ///
    /// The tokenizer already normalized CR and CRLF to LF, so CR cannot
    /// reach tree construction.
    const fn is_whitespace(c: char) -> bool {
        matches!(c, '\t' | '\n' | '\x0C' | ' ')
    }

    /// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#current-node)
    ///
    /// "The current node is the bottommost node in this stack of open
    /// elements."
    fn current_node(&self) -> Option<NodeId> {
        self.stack_of_open_elements.last().copied()
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#adjusted-current-node)
    ///
    /// "The adjusted current node is the context element if the parser was
    /// created as part of the HTML fragment parsing algorithm and the stack
    /// of open elements has only one element in it... otherwise, the
    /// adjusted current node is the current node."
    fn adjusted_current_node(&self) -> Option<NodeId> {
        if let Some(context) = self.fragment_context
            && self.stack_of_open_elements.len() == 1
        {
            return Some(context);
        }
        self.current_node()
    }

    /// Keep the tokenizer's view of the adjusted current node up to date;
    /// it gates `<![CDATA[` handling in the markup declaration open state.
    fn sync_tokenizer_foreign_flag(&mut self) {
        let foreign = self
            .adjusted_current_node()
            .and_then(|id| self.tree.as_element(id))
            .is_some_and(|element| element.namespace != Namespace::Html);
        self.tokenizer.set_is_current_node_foreign(foreign);
    }

    /// Tag name of a node, if it is an element.
    fn get_tag_name(&self, id: NodeId) -> Option<&str> {
        self.tree.as_element(id).map(|data| data.tag_name.as_str())
    }

    /// True when the node is an element in the HTML namespace with the given
    /// tag name. Tag comparisons throughout tree construction are against
    /// HTML elements; foreign elements never match.
    fn is_html_element(&self, id: NodeId, tag_name: &str) -> bool {
        self.tree
            .as_element(id)
            .is_some_and(|element| element.namespace == Namespace::Html && element.tag_name == tag_name)
    }

    /// True when the node is an HTML element with one of the given names.
    fn is_html_element_one_of(&self, id: NodeId, tag_names: &[&str]) -> bool {
        self.tree.as_element(id).is_some_and(|element| {
            element.namespace == Namespace::Html
                && tag_names.contains(&element.tag_name.as_str())
        })
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#special)
    ///
    /// "The following elements have varying levels of special parsing rules:
    /// HTML's address, applet, area, ..."
    fn is_special_element(&self, id: NodeId) -> bool {
        let Some(element) = self.tree.as_element(id) else {
            return false;
        };
        match element.namespace {
            Namespace::Html => matches!(
                element.tag_name.as_str(),
                "address" | "applet" | "area" | "article" | "aside" | "base" | "basefont"
                    | "bgsound" | "blockquote" | "body" | "br" | "button" | "caption"
                    | "center" | "col" | "colgroup" | "dd" | "details" | "dir" | "div" | "dl"
                    | "dt" | "embed" | "fieldset" | "figcaption" | "figure" | "footer"
                    | "form" | "frame" | "frameset" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
                    | "head" | "header" | "hgroup" | "hr" | "html" | "iframe" | "img"
                    | "input" | "keygen" | "li" | "link" | "listing" | "main" | "marquee"
                    | "menu" | "meta" | "nav" | "noembed" | "noframes" | "noscript"
                    | "object" | "ol" | "p" | "param" | "plaintext" | "pre" | "script"
                    | "search" | "section" | "select" | "source" | "style" | "summary"
                    | "table" | "tbody" | "td" | "template" | "textarea" | "tfoot" | "th"
                    | "thead" | "title" | "tr" | "track" | "ul" | "wbr" | "xmp"
            ),
            Namespace::MathMl => matches!(
                element.tag_name.as_str(),
                "mi" | "mo" | "mn" | "ms" | "mtext" | "annotation-xml"
            ),
            Namespace::Svg => matches!(
                element.tag_name.as_str(),
                "foreignObject" | "desc" | "title"
            ),
        }
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
    ///
    /// The formatting element category.
    fn is_formatting_tag(name: &str) -> bool {
        matches!(
            name,
            "a" | "b" | "big" | "code" | "em" | "font" | "i" | "nobr" | "s" | "small"
                | "strike" | "strong" | "tt" | "u"
        )
    }

    /// Build a start tag token out of thin air, for the places where the
    /// tree construction rules act "as if a start tag token with the tag
    /// name X had been seen".
    fn synthetic_start_tag(name: &str, offset: usize) -> Token {
        Token::StartTag {
            name: name.to_string(),
            self_closing: false,
            attributes: Vec::new(),
            offset,
        }
    }

    // ===== CREATING AND INSERTING NODES =====
    // [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#creating-and-inserting-nodes)

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    ///
    /// "If the foster parenting flag is set and the adjusted insertion
    /// location is inside a table, tbody, tfoot, thead, or tr element..."
    ///
    /// Returns `(parent_id, Option<before_id>)`. When `before_id` is `Some`,
    /// the caller must use `insert_before` instead of `append_child`.
    fn foster_parent_location(&self) -> (NodeId, Option<NodeId>) {
        // STEP 1: "Let last table be the last table element in the stack of
        //          open elements, if any."
        let last_table_pos = self
            .stack_of_open_elements
            .iter()
            .rposition(|&id| self.is_html_element(id, "table"));

        // "Let last template be the last template element in the stack of
        //  open elements, if any. If there is a last template and either
        //  there is no last table, or there is one, but last template is
        //  lower... then: let adjusted insertion location be inside last
        //  template's template contents, after its last child."
        let last_template_pos = self
            .stack_of_open_elements
            .iter()
            .rposition(|&id| self.is_html_element(id, "template"));
        if let Some(template_pos) = last_template_pos
            && last_table_pos.is_none_or(|table_pos| template_pos > table_pos)
        {
            return (self.stack_of_open_elements[template_pos], None);
        }

        if let Some(table_pos) = last_table_pos {
            let table_id = self.stack_of_open_elements[table_pos];

            // STEP 2: "If last table has a parent node, then let adjusted
            //          insertion location be before last table in its parent
            //          node."
            if let Some(parent_id) = self.tree.parent(table_id) {
                (parent_id, Some(table_id))
            } else {
                // "Otherwise, let adjusted insertion location be inside the
                //  element immediately above last table in the stack of open
                //  elements."
                let above_table = self.stack_of_open_elements[table_pos - 1];
                (above_table, None)
            }
        } else {
            // STEP 3: "If there is no last table element in the stack of open
            //          elements, then the adjusted insertion location is
            //          inside the first element in the stack of open elements
            //          (the html element)."
            let first = self
                .stack_of_open_elements
                .first()
                .copied()
                .unwrap_or(NodeId::ROOT);
            (first, None)
        }
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
    ///
    /// "The appropriate place for inserting a node, optionally using a
    /// particular override target."
    ///
    /// When foster parenting is active and the target is a table-related
    /// element, delegates to `foster_parent_location()`. Otherwise returns
    /// the target with no insert-before reference.
    fn appropriate_place_for_inserting_a_node(
        &self,
        override_target: Option<NodeId>,
    ) -> (NodeId, Option<NodeId>) {
        // "If there was an override target specified, then let target be the
        //  override target. Otherwise, let target be the current node."
        let target = override_target
            .or_else(|| self.current_node())
            .unwrap_or(NodeId::ROOT);

        // "If foster parenting is enabled and target is a table, tbody,
        //  tfoot, thead, or tr element..."
        if self.foster_parenting
            && self.is_html_element_one_of(target, &["table", "tbody", "tfoot", "thead", "tr"])
        {
            return self.foster_parent_location();
        }

        (target, None)
    }

    /// Insert an already-allocated node at the given insertion location.
    fn insert_at(&mut self, location: (NodeId, Option<NodeId>), node_id: NodeId) {
        let (parent_id, before_id) = location;
        if let Some(ref_id) = before_id {
            self.tree.insert_before(parent_id, node_id, ref_id);
        } else {
            self.tree.append_child(parent_id, node_id);
        }
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#create-an-element-for-the-token)
    ///
    /// "Create an element for a token" in the given namespace. Attribute
    /// case adjustments (SVG, MathML) are the caller's responsibility; the
    /// foreign attribute namespaces are assigned here for non-HTML elements.
    ///
    /// # Panics
    ///
    /// Panics if called with a non-tag token, indicating a parser bug.
    fn create_element_for_token(&mut self, token: &Token, namespace: Namespace) -> NodeId {
        let Token::StartTag {
            name,
            attributes,
            offset,
            ..
        } = token
        else {
            panic!("create_element_for_token called with non-StartTag token");
        };

        let mut element = ElementData::new(name.clone(), namespace);
        for attr in attributes {
            let attr_namespace = if namespace == Namespace::Html {
                // Attributes on HTML elements stay un-namespaced even when
                // their literal name is xlink:-prefixed.
                tupelo_dom::AttrNamespace::None
            } else {
                foreign_attribute_namespace(&attr.name)
            };
            let _ = element.push_attribute(DomAttribute {
                name: attr.name.clone(),
                value: attr.value.clone(),
                namespace: attr_namespace,
                offset: attr.offset,
            });
        }
        self.tree.alloc(NodeType::Element(element), *offset)
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#insert-an-html-element)
    ///
    /// "When the steps below require the user agent to insert an HTML element
    /// for a token, the user agent must insert a foreign element for the
    /// token, in the HTML namespace."
    fn insert_html_element(&mut self, token: &Token) -> NodeId {
        self.insert_foreign_element(token, Namespace::Html)
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-foreign-element)
    ///
    /// "Insert a foreign element for a token":
    /// create the element, insert it at the appropriate place, and push it
    /// onto the stack of open elements.
    fn insert_foreign_element(&mut self, token: &Token, namespace: Namespace) -> NodeId {
        let element_id = self.create_element_for_token(token, namespace);
        let location = self.appropriate_place_for_inserting_a_node(None);
        self.insert_at(location, element_id);
        self.stack_of_open_elements.push(element_id);
        element_id
    }

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    ///
    /// "If there is a Text node immediately before the adjusted insertion
    /// location, then append data to that Text node's data. Otherwise,
    /// create a new Text node..."
    ///
    /// New text nodes carry the byte offset of their first character.
    fn insert_character(&mut self, c: char, offset: usize) {
        let (parent_id, before_id) = self.appropriate_place_for_inserting_a_node(None);

        // "If the adjusted insertion location is in a Document node, then
        //  ignore that token." (Characters must not be inserted directly
        //  into the document.)
        if parent_id == NodeId::ROOT {
            return;
        }

        if let Some(text_id) = self.text_node_immediately_before(parent_id, before_id)
            && let Some(node) = self.tree.get_mut(text_id)
            && let NodeType::Text(data) = &mut node.node_type
        {
            data.push(c);
            return;
        }

        let text_id = self.tree.alloc(NodeType::Text(String::from(c)), offset);
        self.insert_at((parent_id, before_id), text_id);
    }

    /// Insert a character produced by a foreign `<![CDATA[ ... ]]>` section.
    /// CDATA runs coalesce with each other but never with ordinary text.
    fn insert_cdata_character(&mut self, c: char, offset: usize) {
        let (parent_id, before_id) = self.appropriate_place_for_inserting_a_node(None);
        if parent_id == NodeId::ROOT {
            return;
        }

        if let Some(prev_id) = self.node_immediately_before(parent_id, before_id)
            && let Some(node) = self.tree.get_mut(prev_id)
            && let NodeType::Cdata(data) = &mut node.node_type
        {
            data.push(c);
            return;
        }

        let cdata_id = self.tree.alloc(NodeType::Cdata(String::from(c)), offset);
        self.insert_at((parent_id, before_id), cdata_id);
    }

    /// The node sitting immediately before the insertion location, if any.
    fn node_immediately_before(
        &self,
        parent_id: NodeId,
        before_id: Option<NodeId>,
    ) -> Option<NodeId> {
        match before_id {
            Some(ref_id) => self.tree.prev_sibling(ref_id),
            None => self.tree.last_child(parent_id),
        }
    }

    /// The Text node sitting immediately before the insertion location.
    fn text_node_immediately_before(
        &self,
        parent_id: NodeId,
        before_id: Option<NodeId>,
    ) -> Option<NodeId> {
        let prev_id = self.node_immediately_before(parent_id, before_id)?;
        match self.tree.get(prev_id).map(|n| &n.node_type) {
            Some(NodeType::Text(_)) => Some(prev_id),
            _ => None,
        }
    }

    /// [§ 13.2.6.1 Insert a comment](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-comment)
    fn insert_comment(&mut self, data: &str, offset: usize) {
        let location = self.appropriate_place_for_inserting_a_node(None);
        let comment_id = self.tree.alloc(NodeType::Comment(data.to_string()), offset);
        self.insert_at(location, comment_id);
    }

    /// Insert a comment as the last child of the Document node. Used for
    /// comments before `<html>` and after `</html>`.
    fn insert_comment_to_document(&mut self, data: &str, offset: usize) {
        let comment_id = self.tree.alloc(NodeType::Comment(data.to_string()), offset);
        self.tree.append_child(NodeId::ROOT, comment_id);
    }

    /// Insert a comment as the last child of the first element in the stack
    /// of open elements (the html element). Used in the "after body" mode.
    fn insert_comment_to_html_element(&mut self, data: &str, offset: usize) {
        let target = self
            .stack_of_open_elements
            .first()
            .copied()
            .unwrap_or(NodeId::ROOT);
        let comment_id = self.tree.alloc(NodeType::Comment(data.to_string()), offset);
        self.tree.append_child(target, comment_id);
    }

    // ===== STACK OF OPEN ELEMENTS =====
    // [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)

    /// Pop elements until an HTML element with the given tag name has been
    /// popped (inclusive).
    fn pop_until_tag(&mut self, tag_name: &str) {
        while let Some(id) = self.stack_of_open_elements.pop() {
            if self.is_html_element(id, tag_name) {
                break;
            }
        }
    }

    /// Pop elements until an HTML element with one of the given tag names
    /// has been popped (inclusive).
    ///
    /// Used for heading elements per spec: "pop elements from the stack of
    /// open elements until an h1, h2, h3, h4, h5, or h6 element has been
    /// popped from the stack."
    fn pop_until_one_of(&mut self, tag_names: &[&str]) {
        while let Some(id) = self.stack_of_open_elements.pop() {
            if self.is_html_element_one_of(id, tag_names) {
                break;
            }
        }
    }

    /// Pop elements until the given node has been popped (inclusive).
    fn pop_until_node(&mut self, node_id: NodeId) {
        while let Some(id) = self.stack_of_open_elements.pop() {
            if id == node_id {
                break;
            }
        }
    }

    /// Remove a specific element from the stack without popping anything
    /// above it (used by </form> and the adoption agency algorithm).
    fn remove_from_stack(&mut self, node_id: NodeId) {
        if let Some(position) = self
            .stack_of_open_elements
            .iter()
            .position(|&id| id == node_id)
        {
            let _ = self.stack_of_open_elements.remove(position);
        }
    }

    // ===== SCOPES =====
    // [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-scope)

    /// The base scope marker set shared by the default, button, and list
    /// item scopes: "applet, caption, html, table, td, th, marquee, object,
    /// template, MathML mi/mo/mn/ms/mtext/annotation-xml, SVG
    /// foreignObject/desc/title".
    fn is_default_scope_marker(&self, id: NodeId) -> bool {
        let Some(element) = self.tree.as_element(id) else {
            return false;
        };
        match element.namespace {
            Namespace::Html => matches!(
                element.tag_name.as_str(),
                "applet" | "caption" | "html" | "table" | "td" | "th" | "marquee" | "object"
                    | "template"
            ),
            Namespace::MathMl => matches!(
                element.tag_name.as_str(),
                "mi" | "mo" | "mn" | "ms" | "mtext" | "annotation-xml"
            ),
            Namespace::Svg => matches!(
                element.tag_name.as_str(),
                "foreignObject" | "desc" | "title"
            ),
        }
    }

    /// "The stack of open elements is said to have an element target node in
    /// a specific scope consisting of a list of element types list when the
    /// following algorithm terminates in a match state:"
    ///
    /// STEP 1: "Initialize node to be the current node (the bottommost node
    ///          of the stack)."
    /// STEP 2: "If node is the target node, terminate in a match state."
    /// STEP 3: "Otherwise, if node is one of the element types in list,
    ///          terminate in a failure state."
    /// STEP 4: "Otherwise, set node to the previous entry in the stack of
    ///          open elements and return to step 2."
    fn has_element_in_specific_scope(&self, tag_name: &str, extra_html_markers: &[&str]) -> bool {
        for &node_id in self.stack_of_open_elements.iter().rev() {
            // STEP 2: If node is the target, match.
            if self.is_html_element(node_id, tag_name) {
                return true;
            }
            // STEP 3: If node is a scope marker, failure.
            if self.is_default_scope_marker(node_id)
                || self.is_html_element_one_of(node_id, extra_html_markers)
            {
                return false;
            }
            // STEP 4: Continue to previous entry.
        }
        false
    }

    /// "has an element in scope" (default scope).
    fn has_element_in_scope(&self, tag_name: &str) -> bool {
        self.has_element_in_specific_scope(tag_name, &[])
    }

    /// Like `has_element_in_scope`, but matching any of several tag names.
    /// Used for the heading elements.
    fn has_one_of_in_scope(&self, tag_names: &[&str]) -> bool {
        tag_names.iter().any(|name| self.has_element_in_scope(name))
    }

    /// "has an element in button scope" — default scope markers plus button.
    fn has_element_in_button_scope(&self, tag_name: &str) -> bool {
        self.has_element_in_specific_scope(tag_name, &["button"])
    }

    /// "has an element in list item scope" — default scope markers plus
    /// ol, ul.
    fn has_element_in_list_item_scope(&self, tag_name: &str) -> bool {
        self.has_element_in_specific_scope(tag_name, &["ol", "ul"])
    }

    /// "has an element in table scope" — scope markers: html, table,
    /// template.
    fn has_element_in_table_scope(&self, tag_name: &str) -> bool {
        for &node_id in self.stack_of_open_elements.iter().rev() {
            if self.is_html_element(node_id, tag_name) {
                return true;
            }
            if self.is_html_element_one_of(node_id, &["html", "table", "template"]) {
                return false;
            }
        }
        false
    }

    /// Like `has_element_in_table_scope`, but matching any of several tag
    /// names. Used for td/th and the table section elements.
    fn has_one_of_in_table_scope(&self, tag_names: &[&str]) -> bool {
        tag_names
            .iter()
            .any(|name| self.has_element_in_table_scope(name))
    }

    /// "has an element in select scope" — the scope consists of all element
    /// types *except* optgroup and option, so the walk fails on the first
    /// element that is neither.
    fn has_element_in_select_scope(&self, tag_name: &str) -> bool {
        for &node_id in self.stack_of_open_elements.iter().rev() {
            if self.is_html_element(node_id, tag_name) {
                return true;
            }
            if !self.is_html_element_one_of(node_id, &["optgroup", "option"]) {
                return false;
            }
        }
        false
    }

    // ===== IMPLIED END TAGS =====

    /// [§ 13.2.6.3](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
    ///
    /// "When the steps below require the UA to generate implied end tags,
    /// then, while the current node is a dd element, a dt element, an li
    /// element, an optgroup element, an option element, a p element, an rb
    /// element, an rp element, an rt element, or an rtc element, the UA must
    /// pop the current node off the stack of open elements."
    fn generate_implied_end_tags(&mut self, except: Option<&str>) {
        while let Some(current) = self.current_node() {
            let Some(element) = self.tree.as_element(current) else {
                break;
            };
            if element.namespace != Namespace::Html {
                break;
            }
            let tag = element.tag_name.as_str();
            if except == Some(tag) {
                break;
            }
            if !matches!(
                tag,
                "dd" | "dt" | "li" | "optgroup" | "option" | "p" | "rb" | "rp" | "rt" | "rtc"
            ) {
                break;
            }
            let _ = self.stack_of_open_elements.pop();
        }
    }

    /// "When the steps below require the UA to generate all implied end tags
    /// thoroughly, then, while the current node is [the above plus] a
    /// caption element, a colgroup element, a tbody element, a td element, a
    /// tfoot element, a th element, a thead element, or a tr element, the UA
    /// must pop the current node off the stack of open elements."
    fn generate_all_implied_end_tags_thoroughly(&mut self) {
        while let Some(current) = self.current_node() {
            if !self.is_html_element_one_of(
                current,
                &[
                    "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc",
                    "caption", "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr",
                ],
            ) {
                break;
            }
            let _ = self.stack_of_open_elements.pop();
        }
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#close-a-p-element)
    ///
    /// "Generate implied end tags, except for p elements. If the current
    /// node is not a p element, then this is a parse error. Pop elements
    /// from the stack of open elements until a p element has been popped
    /// from the stack."
    fn close_a_p_element(&mut self, offset: usize) {
        self.generate_implied_end_tags(Some("p"));
        if !self
            .current_node()
            .is_some_and(|id| self.is_html_element(id, "p"))
        {
            self.parse_error(ErrorCode::UnexpectedEndTag, offset);
        }
        self.pop_until_tag("p");
    }
}

// ===== ACTIVE FORMATTING ELEMENTS =====
// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)

impl HTMLParser {
    /// Index of the last `Element` entry after the last marker whose tag
    /// name matches, along with its node id.
    fn find_formatting_element(&self, tag_name: &str) -> Option<(usize, NodeId)> {
        for (index, entry) in self.active_formatting_elements.iter().enumerate().rev() {
            match entry {
                ActiveFormattingElement::Marker => return None,
                ActiveFormattingElement::Element { node_id, .. } => {
                    if self.is_html_element(*node_id, tag_name) {
                        return Some((index, *node_id));
                    }
                }
            }
        }
        None
    }

    /// True when the node appears in the list of active formatting elements.
    fn formatting_list_contains(&self, node_id: NodeId) -> bool {
        self.active_formatting_elements.iter().any(|entry| {
            matches!(entry, ActiveFormattingElement::Element { node_id: id, .. } if *id == node_id)
        })
    }

    /// Remove a node's entry from the list of active formatting elements.
    fn remove_from_formatting_list(&mut self, node_id: NodeId) {
        if let Some(position) = self.active_formatting_elements.iter().position(|entry| {
            matches!(entry, ActiveFormattingElement::Element { node_id: id, .. } if *id == node_id)
        }) {
            let _ = self.active_formatting_elements.remove(position);
        }
    }

    /// "Push onto the list of active formatting elements."
    ///
    /// Implements the Noah's Ark clause: "If there are already three
    /// elements in the list of active formatting elements after the last
    /// marker, if any, or anywhere in the list if there are no markers, that
    /// have the same tag name, namespace, and attributes as element, then
    /// remove the earliest such element."
    fn push_formatting_element(&mut self, node_id: NodeId, token: &Token) {
        let mut matching = Vec::new();
        for (index, entry) in self.active_formatting_elements.iter().enumerate().rev() {
            match entry {
                ActiveFormattingElement::Marker => break,
                ActiveFormattingElement::Element { node_id: id, .. } => {
                    if self.elements_equivalent(*id, node_id) {
                        matching.push(index);
                    }
                }
            }
        }
        if matching.len() >= 3 {
            // `matching` is in reverse order; the last entry is the earliest.
            let earliest = *matching.last().unwrap_or(&0);
            let _ = self.active_formatting_elements.remove(earliest);
        }

        self.active_formatting_elements
            .push(ActiveFormattingElement::Element {
                node_id,
                token: token.clone(),
            });
    }

    /// Noah's Ark comparison: same tag name, namespace, and attributes
    /// (name, value, and attribute namespace; source offsets are ignored).
    fn elements_equivalent(&self, a: NodeId, b: NodeId) -> bool {
        let (Some(ea), Some(eb)) = (self.tree.as_element(a), self.tree.as_element(b)) else {
            return false;
        };
        if ea.tag_name != eb.tag_name
            || ea.namespace != eb.namespace
            || ea.attributes.len() != eb.attributes.len()
        {
            return false;
        }
        ea.attributes.iter().all(|attr| {
            eb.attributes.iter().any(|other| {
                attr.name == other.name
                    && attr.value == other.value
                    && attr.namespace == other.namespace
            })
        })
    }

    /// "Insert a marker at the end of the list of active formatting
    /// elements."
    fn insert_formatting_marker(&mut self) {
        self.active_formatting_elements
            .push(ActiveFormattingElement::Marker);
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-list-of-active-formatting-elements-up-to-the-last-marker)
    ///
    /// "Clear the list of active formatting elements up to the last marker."
    fn clear_formatting_elements_to_marker(&mut self) {
        while let Some(entry) = self.active_formatting_elements.pop() {
            if matches!(entry, ActiveFormattingElement::Marker) {
                break;
            }
        }
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#reconstruct-the-active-formatting-elements)
    ///
    /// "When the steps below require the UA to reconstruct the active
    /// formatting elements, the UA must perform the following steps."
    fn reconstruct_active_formatting_elements(&mut self) {
        // STEP 1: "If there are no entries in the list of active formatting
        //          elements, then there is nothing to reconstruct."
        if self.active_formatting_elements.is_empty() {
            return;
        }

        // STEP 2-3: "If the last entry in the list is a marker or an element
        //            that is in the stack of open elements, there is nothing
        //            to reconstruct."
        let last_index = self.active_formatting_elements.len() - 1;
        if self.entry_is_marker_or_open(last_index) {
            return;
        }

        // STEP 4-6: Rewind to the earliest entry that needs recreating.
        let mut index = last_index;
        while index > 0 && !self.entry_is_marker_or_open(index - 1) {
            index -= 1;
        }

        // STEP 7-10: Create, advance, repeat.
        loop {
            let token = match &self.active_formatting_elements[index] {
                ActiveFormattingElement::Element { token, .. } => token.clone(),
                ActiveFormattingElement::Marker => break,
            };
            // "Insert an HTML element for the token for which the entry was
            //  created, to obtain new element."
            let new_id = self.insert_html_element(&token);
            // "Replace the entry with an entry for the new element."
            self.active_formatting_elements[index] = ActiveFormattingElement::Element {
                node_id: new_id,
                token,
            };
            // "If this entry is the last entry, stop."
            if index == self.active_formatting_elements.len() - 1 {
                break;
            }
            index += 1;
        }
    }

    fn entry_is_marker_or_open(&self, index: usize) -> bool {
        match &self.active_formatting_elements[index] {
            ActiveFormattingElement::Marker => true,
            ActiveFormattingElement::Element { node_id, .. } => {
                self.stack_of_open_elements.contains(node_id)
            }
        }
    }
}

// ===== ADOPTION AGENCY =====
// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm)

impl HTMLParser {
    /// "The adoption agency algorithm, which takes as its only argument a
    /// token for which the algorithm is being run."
    ///
    /// Returns `true` when the caller should fall back to the "any other end
    /// tag" steps (the algorithm found no matching formatting element).
    fn run_adoption_agency(&mut self, token: &Token) -> bool {
        let Token::EndTag { name, offset, .. } = token else {
            return false;
        };
        let subject = name.as_str();
        let offset = *offset;

        // STEP 2: "If the current node is an HTML element whose tag name is
        //          subject, and the current node is not in the list of
        //          active formatting elements, then pop the current node off
        //          the stack of open elements and return."
        if let Some(current) = self.current_node()
            && self.is_html_element(current, subject)
            && !self.formatting_list_contains(current)
        {
            let _ = self.stack_of_open_elements.pop();
            return false;
        }

        // STEP 3-4: "Let outer loop counter be 0. While outer loop counter
        //            is less than 8..."
        for _ in 0..8 {
            // STEP 6: "Let formatting element be the last element in the
            //          list of active formatting elements that is between
            //          the end of the list and the last marker... and has
            //          the tag name subject."
            let Some((formatting_index, formatting_element)) =
                self.find_formatting_element(subject)
            else {
                // "If there is no such element, then return and instead act
                //  as described in the 'any other end tag' entry."
                return true;
            };

            // STEP 7: "If formatting element is not in the stack of open
            //          elements, then this is a parse error; remove the
            //          element from the list, and return."
            let Some(stack_index) = self
                .stack_of_open_elements
                .iter()
                .position(|&id| id == formatting_element)
            else {
                self.parse_error(ErrorCode::MisnestedFormattingElement, offset);
                let _ = self.active_formatting_elements.remove(formatting_index);
                return false;
            };

            // STEP 8: "If formatting element is in the stack of open
            //          elements, but the element is not in scope, then this
            //          is a parse error; return."
            if !self.has_element_in_scope(subject) {
                self.parse_error(ErrorCode::MisnestedFormattingElement, offset);
                return false;
            }

            // STEP 9: "If formatting element is not the current node, this
            //          is a parse error. (But do not return.)"
            if self.current_node() != Some(formatting_element) {
                self.parse_error(ErrorCode::MisnestedFormattingElement, offset);
            }

            // STEP 10: "Let furthest block be the topmost node in the stack
            //           of open elements that is lower in the stack than
            //           formatting element, and is an element in the special
            //           category. There might not be one."
            let furthest_block = self.stack_of_open_elements[stack_index + 1..]
                .iter()
                .copied()
                .find(|&id| self.is_special_element(id));

            // STEP 11: "If there is no furthest block, then the UA must
            //           first pop all the nodes from the bottom of the stack
            //           of open elements, from the current node up to and
            //           including formatting element, then remove formatting
            //           element from the list of active formatting elements,
            //           and finally return."
            let Some(furthest_block) = furthest_block else {
                self.pop_until_node(formatting_element);
                let _ = self.active_formatting_elements.remove(formatting_index);
                return false;
            };

            // STEP 12: "Let common ancestor be the element immediately above
            //           formatting element in the stack of open elements."
            let common_ancestor = self.stack_of_open_elements[stack_index - 1];

            // STEP 13: "Let a bookmark note the position of formatting
            //           element in the list of active formatting elements."
            let mut bookmark = formatting_index;

            // STEP 14: "Let node and last node be furthest block."
            let mut node = furthest_block;
            let mut node_stack_index = self
                .stack_of_open_elements
                .iter()
                .position(|&id| id == furthest_block)
                .unwrap_or(stack_index + 1);
            let mut last_node = furthest_block;

            let mut inner_loop_counter = 0;
            loop {
                // STEP 14.1: "Increment inner loop counter by 1."
                inner_loop_counter += 1;

                // STEP 14.2: "Let node be the element immediately above node
                //             in the stack of open elements, or if node is no
                //             longer in the stack of open elements (e.g. if it
                //             got removed by this algorithm), the element that
                //             was immediately above node in the stack of open
                //             elements before node was removed."
                node_stack_index -= 1;
                node = self.stack_of_open_elements[node_stack_index];

                // STEP 14.3: "If node is formatting element, then break."
                if node == formatting_element {
                    break;
                }

                // STEP 14.4: "If inner loop counter is greater than 3 and
                //             node is in the list of active formatting
                //             elements, then remove node from the list."
                let mut node_formatting_index = self
                    .active_formatting_elements
                    .iter()
                    .position(|entry| {
                        matches!(entry, ActiveFormattingElement::Element { node_id, .. } if *node_id == node)
                    });
                if inner_loop_counter > 3
                    && let Some(list_index) = node_formatting_index
                {
                    let _ = self.active_formatting_elements.remove(list_index);
                    if list_index < bookmark {
                        bookmark -= 1;
                    }
                    node_formatting_index = None;
                }

                // STEP 14.5: "If node is not in the list of active formatting
                //             elements, then remove node from the stack of
                //             open elements and continue."
                let Some(list_index) = node_formatting_index else {
                    let _ = self.stack_of_open_elements.remove(node_stack_index);
                    continue;
                };

                // STEP 14.6: "Create an element for the token for which the
                //             element node was created... Replace the entry
                //             for node in the list of active formatting
                //             elements with an entry for the new element, and
                //             replace the entry for node in the stack of open
                //             elements with an entry for the new element."
                let node_token = match &self.active_formatting_elements[list_index] {
                    ActiveFormattingElement::Element { token, .. } => token.clone(),
                    ActiveFormattingElement::Marker => unreachable!("index points at an element"),
                };
                let new_node = self.create_element_for_token(&node_token, Namespace::Html);
                self.active_formatting_elements[list_index] = ActiveFormattingElement::Element {
                    node_id: new_node,
                    token: node_token,
                };
                self.stack_of_open_elements[node_stack_index] = new_node;
                node = new_node;

                // STEP 14.7: "If last node is furthest block, then move the
                //             aforementioned bookmark to be immediately after
                //             the new node in the list of active formatting
                //             elements."
                if last_node == furthest_block {
                    bookmark = list_index + 1;
                }

                // STEP 14.8: "Append last node to node."
                if let Some(parent) = self.tree.parent(last_node) {
                    self.tree.remove_child(parent, last_node);
                }
                self.tree.append_child(node, last_node);

                // STEP 14.9: "Set last node to node."
                last_node = node;
            }

            // STEP 15: "Insert whatever last node ended up being in the
            //           previous step at the appropriate place for inserting
            //           a node, but using common ancestor as the override
            //           target."
            if let Some(parent) = self.tree.parent(last_node) {
                self.tree.remove_child(parent, last_node);
            }
            let location = self.appropriate_place_for_inserting_a_node(Some(common_ancestor));
            self.insert_at(location, last_node);

            // STEP 16: "Create an element for the token for which formatting
            //           element was created, in the HTML namespace, with
            //           furthest block as the intended parent."
            let formatting_token = match &self.active_formatting_elements[formatting_index] {
                ActiveFormattingElement::Element { token, .. } => token.clone(),
                ActiveFormattingElement::Marker => unreachable!("index points at an element"),
            };
            let new_element = self.create_element_for_token(&formatting_token, Namespace::Html);

            // STEP 17: "Take all of the child nodes of furthest block and
            //           append them to the element created in the last step."
            self.tree.move_children(furthest_block, new_element);

            // STEP 18: "Append that new element to furthest block."
            self.tree.append_child(furthest_block, new_element);

            // STEP 19: "Remove formatting element from the list of active
            //           formatting elements, and insert the new element into
            //           the list... at the position of the aforementioned
            //           bookmark."
            let _ = self.active_formatting_elements.remove(formatting_index);
            if formatting_index < bookmark {
                bookmark -= 1;
            }
            let bookmark = bookmark.min(self.active_formatting_elements.len());
            self.active_formatting_elements.insert(
                bookmark,
                ActiveFormattingElement::Element {
                    node_id: new_element,
                    token: formatting_token,
                },
            );

            // STEP 20: "Remove formatting element from the stack of open
            //           elements, and insert the new element into the stack
            //           of open elements immediately below the position of
            //           furthest block in that stack."
            self.remove_from_stack(formatting_element);
            if let Some(block_index) = self
                .stack_of_open_elements
                .iter()
                .position(|&id| id == furthest_block)
            {
                self.stack_of_open_elements
                    .insert(block_index + 1, new_element);
            }
        }
        false
    }
}

// ===== RESETTING AND GENERIC PARSING =====

impl HTMLParser {
    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#reset-the-insertion-mode-appropriately)
    ///
    /// "When the steps below require the UA to reset the insertion mode
    /// appropriately, it means the UA must follow these steps."
    fn reset_insertion_mode_appropriately(&mut self) {
        for (position, &node_id) in self.stack_of_open_elements.iter().enumerate().rev() {
            // STEP 1: "Let last be false... if node is the first node in the
            //          stack of open elements, then set last to true, and,
            //          if the parser was created as part of the HTML
            //          fragment parsing algorithm, set node to the context
            //          element."
            let last = position == 0;
            let node = if last {
                self.fragment_context.unwrap_or(node_id)
            } else {
                node_id
            };
            let Some(element) = self.tree.as_element(node) else {
                continue;
            };
            if element.namespace != Namespace::Html {
                if last {
                    self.insertion_mode = InsertionMode::InBody;
                    return;
                }
                continue;
            }

            match element.tag_name.as_str() {
                // "If node is a select element... If node is a table
                //  element, switch... to 'in select in table'" (walking the
                //  ancestors in the stack).
                "select" => {
                    if !last {
                        for &ancestor in self.stack_of_open_elements[..position].iter().rev() {
                            if self.is_html_element(ancestor, "template") {
                                break;
                            }
                            if self.is_html_element(ancestor, "table") {
                                self.insertion_mode = InsertionMode::InSelectInTable;
                                return;
                            }
                        }
                    }
                    self.insertion_mode = InsertionMode::InSelect;
                    return;
                }
                "td" | "th" if !last => {
                    self.insertion_mode = InsertionMode::InCell;
                    return;
                }
                "tr" => {
                    self.insertion_mode = InsertionMode::InRow;
                    return;
                }
                "tbody" | "thead" | "tfoot" => {
                    self.insertion_mode = InsertionMode::InTableBody;
                    return;
                }
                "caption" => {
                    self.insertion_mode = InsertionMode::InCaption;
                    return;
                }
                "colgroup" => {
                    self.insertion_mode = InsertionMode::InColumnGroup;
                    return;
                }
                "table" => {
                    self.insertion_mode = InsertionMode::InTable;
                    return;
                }
                // "If node is a template element, then switch the insertion
                //  mode to the current template insertion mode."
                "template" => {
                    self.insertion_mode = self
                        .template_insertion_modes
                        .last()
                        .copied()
                        .unwrap_or(InsertionMode::InBody);
                    return;
                }
                "head" if !last => {
                    self.insertion_mode = InsertionMode::InHead;
                    return;
                }
                "body" => {
                    self.insertion_mode = InsertionMode::InBody;
                    return;
                }
                "frameset" => {
                    self.insertion_mode = InsertionMode::InFrameset;
                    return;
                }
                "html" => {
                    self.insertion_mode = if self.head_element_pointer.is_none() {
                        InsertionMode::BeforeHead
                    } else {
                        InsertionMode::AfterHead
                    };
                    return;
                }
                _ => {}
            }

            // "If last is true, then switch the insertion mode to 'in body'."
            if last {
                self.insertion_mode = InsertionMode::InBody;
                return;
            }
        }
        // Empty stack only happens before the first element is seen.
        self.insertion_mode = InsertionMode::InBody;
    }

    /// [§ 13.2.6.2](https://html.spec.whatwg.org/multipage/parsing.html#generic-raw-text-element-parsing-algorithm)
    ///
    /// "The generic raw text element parsing algorithm and the generic
    /// RCDATA element parsing algorithm consist of the following steps.
    /// These algorithms are always invoked in response to a start tag token."
    fn follow_generic_text_element_parsing_algorithm(
        &mut self,
        token: &Token,
        state: TokenizerState,
    ) {
        // STEP 1: "Insert an HTML element for the token."
        let _ = self.insert_html_element(token);
        // STEP 2: "...switch the tokenizer to the RAWTEXT state [or] the
        //          RCDATA state."
        self.tokenizer.set_state(state);
        // STEP 3: "Let the original insertion mode be the current insertion
        //          mode."
        self.original_insertion_mode = Some(self.insertion_mode);
        // STEP 4: "Then, switch the insertion mode to 'text'."
        self.insertion_mode = InsertionMode::Text;
    }

    /// [§ 13.2.7 The end](https://html.spec.whatwg.org/multipage/parsing.html#stop-parsing)
    fn stop_parsing(&mut self) {
        self.stopped = true;
    }

    /// [§ 13.2.6.4.4](https://html.spec.whatwg.org/multipage/parsing.html#the-in-head-insertion-mode)
    ///
    /// The shared `</template>` handling, reachable from several modes.
    fn handle_template_end_tag(&mut self, offset: usize) {
        // "If there is no template element on the stack of open elements,
        //  then this is a parse error; ignore the token."
        let has_template = self
            .stack_of_open_elements
            .iter()
            .any(|&id| self.is_html_element(id, "template"));
        if !has_template {
            self.parse_error(ErrorCode::UnexpectedEndTag, offset);
            return;
        }
        // "Otherwise: Generate all implied end tags thoroughly."
        self.generate_all_implied_end_tags_thoroughly();
        // "If the current node is not a template element, then this is a
        //  parse error."
        if !self
            .current_node()
            .is_some_and(|id| self.is_html_element(id, "template"))
        {
            self.parse_error(ErrorCode::UnexpectedEndTag, offset);
        }
        // "Pop elements from the stack of open elements until a template
        //  element has been popped from the stack."
        self.pop_until_tag("template");
        // "Clear the list of active formatting elements up to the last
        //  marker. Pop the current template insertion mode off the stack of
        //  template insertion modes. Reset the insertion mode appropriately."
        self.clear_formatting_elements_to_marker();
        let _ = self.template_insertion_modes.pop();
        self.reset_insertion_mode_appropriately();
    }
}

// ===== THE INSERTION MODES (DOCUMENT SKELETON) =====
// [§ 13.2.6.4](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhtml)

impl HTMLParser {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    fn handle_initial_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is one of U+0009, U+000A, U+000C,
            //  U+000D, or U+0020: Ignore the token."
            Token::Character { data, .. } if Self::is_whitespace(*data) => {}
            // "A comment token: Insert a comment as the last child of the
            //  Document object."
            Token::Comment { data, offset } => {
                self.insert_comment_to_document(data, *offset);
            }
            // "A DOCTYPE token"
            Token::Doctype {
                name,
                public_identifier,
                system_identifier,
                force_quirks,
                offset,
            } => {
                // "If the DOCTYPE token's name is not 'html', or the token's
                //  public identifier is not missing, or the token's system
                //  identifier is neither missing nor 'about:legacy-compat',
                //  then there is a parse error."
                let legacy_compat = system_identifier.as_deref() == Some("about:legacy-compat");
                if name.as_deref() != Some("html")
                    || public_identifier.is_some()
                    || (system_identifier.is_some() && !legacy_compat)
                {
                    self.parse_error(ErrorCode::UnexpectedDoctype, *offset);
                }

                // "Append a DocumentType node to the Document node..."
                let document = self.tree.document_mut();
                document.has_doctype = true;
                document.name = name.clone();
                document.public_identifier = public_identifier.clone();
                document.system_identifier = system_identifier.clone();
                document.quirks_mode = quirks_mode_from_doctype(
                    name.as_deref(),
                    public_identifier.as_deref(),
                    system_identifier.as_deref(),
                    *force_quirks,
                );

                // "Then, switch the insertion mode to 'before html'."
                self.insertion_mode = InsertionMode::BeforeHtml;
            }
            // "Anything else: If the document is not an iframe srcdoc
            //  document, then this is a parse error... set the Document to
            //  quirks mode. In any case, switch the insertion mode to
            //  'before html', then reprocess the token."
            _ => {
                self.parse_error(ErrorCode::MissingDoctype, token.offset());
                self.tree.document_mut().quirks_mode = QuirksMode::Quirks;
                self.insertion_mode = InsertionMode::BeforeHtml;
                self.reprocess_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    fn handle_before_html_mode(&mut self, token: &Token) {
        match token {
            // "A DOCTYPE token: Parse error. Ignore the token."
            Token::Doctype { offset, .. } => {
                self.parse_error(ErrorCode::UnexpectedDoctype, *offset);
            }
            Token::Comment { data, offset } => {
                self.insert_comment_to_document(data, *offset);
            }
            Token::Character { data, .. } if Self::is_whitespace(*data) => {}
            // "A start tag whose tag name is 'html': Create an element for
            //  the token... Append it to the Document object. Put this
            //  element in the stack of open elements."
            Token::StartTag { name, .. } if name == "html" => {
                let element_id = self.create_element_for_token(token, Namespace::Html);
                self.tree.append_child(NodeId::ROOT, element_id);
                self.stack_of_open_elements.push(element_id);
                // "Switch the insertion mode to 'before head'."
                self.insertion_mode = InsertionMode::BeforeHead;
            }
            // "An end tag whose tag name is one of: 'head', 'body', 'html',
            //  'br': Act as described in the 'anything else' entry below."
            Token::EndTag { name, .. }
                if matches!(name.as_str(), "head" | "body" | "html" | "br") =>
            {
                self.before_html_anything_else(token);
            }
            // "Any other end tag: Parse error. Ignore the token."
            Token::EndTag { offset, .. } => {
                self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
            }
            _ => self.before_html_anything_else(token),
        }
    }

    /// "Create an html element whose node document is the Document object.
    /// Append it to the Document object. Put this element in the stack of
    /// open elements. Switch the insertion mode to 'before head', then
    /// reprocess the token."
    fn before_html_anything_else(&mut self, token: &Token) {
        let html = Self::synthetic_start_tag("html", token.offset());
        let element_id = self.create_element_for_token(&html, Namespace::Html);
        self.tree.append_child(NodeId::ROOT, element_id);
        self.stack_of_open_elements.push(element_id);
        self.insertion_mode = InsertionMode::BeforeHead;
        self.reprocess_token(token);
    }

    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    fn handle_before_head_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data, .. } if Self::is_whitespace(*data) => {}
            Token::Comment { data, offset } => self.insert_comment(data, *offset),
            Token::Doctype { offset, .. } => {
                self.parse_error(ErrorCode::UnexpectedDoctype, *offset);
            }
            // "A start tag whose tag name is 'html': Process the token using
            //  the rules for the 'in body' insertion mode."
            Token::StartTag { name, .. } if name == "html" => {
                self.handle_in_body_mode(token);
            }
            // "A start tag whose tag name is 'head': Insert an HTML element
            //  for the token. Set the head element pointer to the newly
            //  created head element."
            Token::StartTag { name, .. } if name == "head" => {
                let head_id = self.insert_html_element(token);
                self.head_element_pointer = Some(head_id);
                self.insertion_mode = InsertionMode::InHead;
            }
            Token::EndTag { name, .. }
                if matches!(name.as_str(), "head" | "body" | "html" | "br") =>
            {
                self.before_head_anything_else(token);
            }
            Token::EndTag { offset, .. } => {
                self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
            }
            // "Anything else: Insert an HTML element for a 'head' start tag
            //  token with no attributes."
            _ => self.before_head_anything_else(token),
        }
    }

    fn before_head_anything_else(&mut self, token: &Token) {
        let head = Self::synthetic_start_tag("head", token.offset());
        let head_id = self.insert_html_element(&head);
        self.head_element_pointer = Some(head_id);
        self.insertion_mode = InsertionMode::InHead;
        self.reprocess_token(token);
    }

    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    fn handle_in_head_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is one of U+0009, U+000A, U+000C,
            //  U+000D, or U+0020: Insert the character."
            Token::Character { data, offset } if Self::is_whitespace(*data) => {
                self.insert_character(*data, *offset);
            }
            Token::Comment { data, offset } => self.insert_comment(data, *offset),
            Token::Doctype { offset, .. } => {
                self.parse_error(ErrorCode::UnexpectedDoctype, *offset);
            }
            Token::StartTag { name, .. } if name == "html" => {
                self.handle_in_body_mode(token);
            }
            // "A start tag whose tag name is one of: 'base', 'basefont',
            //  'bgsound', 'link': Insert an HTML element for the token.
            //  Immediately pop the current node off the stack of open
            //  elements."
            Token::StartTag { name, .. }
                if matches!(name.as_str(), "base" | "basefont" | "bgsound" | "link" | "meta") =>
            {
                let _ = self.insert_html_element(token);
                let _ = self.stack_of_open_elements.pop();
                // "Acknowledge the token's self-closing flag, if it is set."
            }
            // "A start tag whose tag name is 'title': Follow the generic
            //  RCDATA element parsing algorithm."
            Token::StartTag { name, .. } if name == "title" => {
                self.follow_generic_text_element_parsing_algorithm(token, TokenizerState::RCDATA);
            }
            // "A start tag whose tag name is 'noscript', if the scripting
            //  flag is disabled: Insert an HTML element for the token.
            //  Switch the insertion mode to 'in head noscript'."
            Token::StartTag { name, .. } if name == "noscript" => {
                let _ = self.insert_html_element(token);
                self.insertion_mode = InsertionMode::InHeadNoscript;
            }
            // "A start tag whose tag name is one of: 'noframes', 'style':
            //  Follow the generic raw text element parsing algorithm."
            Token::StartTag { name, .. } if matches!(name.as_str(), "noframes" | "style") => {
                self.follow_generic_text_element_parsing_algorithm(token, TokenizerState::RAWTEXT);
            }
            // "A start tag whose tag name is 'script'"
            Token::StartTag { name, .. } if name == "script" => {
                let _ = self.insert_html_element(token);
                self.tokenizer.set_state(TokenizerState::ScriptData);
                self.original_insertion_mode = Some(self.insertion_mode);
                self.insertion_mode = InsertionMode::Text;
            }
            // "An end tag whose tag name is 'head': Pop the current node
            //  (which will be the head element) off the stack of open
            //  elements. Switch the insertion mode to 'after head'."
            Token::EndTag { name, .. } if name == "head" => {
                let _ = self.stack_of_open_elements.pop();
                self.insertion_mode = InsertionMode::AfterHead;
            }
            // "A start tag whose tag name is 'template'"
            Token::StartTag { name, .. } if name == "template" => {
                let _ = self.insert_html_element(token);
                self.insert_formatting_marker();
                self.frameset_ok = false;
                self.insertion_mode = InsertionMode::InTemplate;
                self.template_insertion_modes.push(InsertionMode::InTemplate);
            }
            Token::EndTag { name, offset, .. } if name == "template" => {
                self.handle_template_end_tag(*offset);
            }
            Token::EndTag { name, .. }
                if matches!(name.as_str(), "body" | "html" | "br") =>
            {
                self.in_head_anything_else(token);
            }
            // "A start tag whose tag name is 'head' [or] any other end tag:
            //  Parse error. Ignore the token."
            Token::StartTag { name, offset, .. } if name == "head" => {
                self.parse_error(ErrorCode::UnexpectedStartTag, *offset);
            }
            Token::EndTag { offset, .. } => {
                self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
            }
            // "Anything else: Pop the current node (which will be the head
            //  element) off the stack of open elements. Switch the insertion
            //  mode to 'after head'. Reprocess the token."
            _ => self.in_head_anything_else(token),
        }
    }

    fn in_head_anything_else(&mut self, token: &Token) {
        let _ = self.stack_of_open_elements.pop();
        self.insertion_mode = InsertionMode::AfterHead;
        self.reprocess_token(token);
    }

    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    fn handle_in_head_noscript_mode(&mut self, token: &Token) {
        match token {
            Token::Doctype { offset, .. } => {
                self.parse_error(ErrorCode::UnexpectedDoctype, *offset);
            }
            Token::StartTag { name, .. } if name == "html" => {
                self.handle_in_body_mode(token);
            }
            // "An end tag whose tag name is 'noscript': Pop the current node
            //  (which will be a noscript element)... Switch the insertion
            //  mode to 'in head'."
            Token::EndTag { name, .. } if name == "noscript" => {
                let _ = self.stack_of_open_elements.pop();
                self.insertion_mode = InsertionMode::InHead;
            }
            // "...Process the token using the rules for the 'in head'
            //  insertion mode."
            Token::Character { data, .. } if Self::is_whitespace(*data) => {
                self.handle_in_head_mode(token);
            }
            Token::Comment { .. } => self.handle_in_head_mode(token),
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "basefont" | "bgsound" | "link" | "meta" | "noframes" | "style"
                ) =>
            {
                self.handle_in_head_mode(token);
            }
            Token::EndTag { name, .. } if name == "br" => {
                self.in_head_noscript_anything_else(token);
            }
            // "A start tag whose tag name is one of: 'head', 'noscript' [or]
            //  any other end tag: Parse error. Ignore the token."
            Token::StartTag { name, offset, .. }
                if matches!(name.as_str(), "head" | "noscript") =>
            {
                self.parse_error(ErrorCode::UnexpectedStartTag, *offset);
            }
            Token::EndTag { offset, .. } => {
                self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
            }
            _ => self.in_head_noscript_anything_else(token),
        }
    }

    /// "Parse error. Pop the current node (which will be a noscript element)
    /// off the stack of open elements... Switch the insertion mode to
    /// 'in head'. Reprocess the token."
    fn in_head_noscript_anything_else(&mut self, token: &Token) {
        self.parse_error(ErrorCode::UnexpectedCharacter, token.offset());
        let _ = self.stack_of_open_elements.pop();
        self.insertion_mode = InsertionMode::InHead;
        self.reprocess_token(token);
    }

    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    fn handle_after_head_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data, offset } if Self::is_whitespace(*data) => {
                self.insert_character(*data, *offset);
            }
            Token::Comment { data, offset } => self.insert_comment(data, *offset),
            Token::Doctype { offset, .. } => {
                self.parse_error(ErrorCode::UnexpectedDoctype, *offset);
            }
            Token::StartTag { name, .. } if name == "html" => {
                self.handle_in_body_mode(token);
            }
            // "A start tag whose tag name is 'body': Insert an HTML element
            //  for the token. Set the frameset-ok flag to 'not ok'. Switch
            //  the insertion mode to 'in body'."
            Token::StartTag { name, .. } if name == "body" => {
                let _ = self.insert_html_element(token);
                self.frameset_ok = false;
                self.insertion_mode = InsertionMode::InBody;
            }
            // "A start tag whose tag name is 'frameset': Insert an HTML
            //  element for the token. Switch the insertion mode to
            //  'in frameset'."
            Token::StartTag { name, .. } if name == "frameset" => {
                let _ = self.insert_html_element(token);
                self.insertion_mode = InsertionMode::InFrameset;
            }
            // "A start tag whose tag name is one of: 'base', 'basefont',
            //  'bgsound', 'link', 'meta', 'noframes', 'script', 'style',
            //  'template', 'title': Parse error. Push the node pointed to by
            //  the head element pointer onto the stack of open elements.
            //  Process the token using the rules for the 'in head' insertion
            //  mode. Remove the node pointed to by the head element pointer
            //  from the stack of open elements."
            Token::StartTag { name, offset, .. }
                if matches!(
                    name.as_str(),
                    "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script"
                        | "style" | "template" | "title"
                ) =>
            {
                self.parse_error(ErrorCode::UnexpectedStartTag, *offset);
                let Some(head_id) = self.head_element_pointer else {
                    return;
                };
                self.stack_of_open_elements.push(head_id);
                self.handle_in_head_mode(token);
                self.remove_from_stack(head_id);
            }
            Token::EndTag { name, offset, .. } if name == "template" => {
                self.handle_template_end_tag(*offset);
            }
            Token::EndTag { name, .. }
                if matches!(name.as_str(), "body" | "html" | "br") =>
            {
                self.after_head_anything_else(token);
            }
            Token::StartTag { name, offset, .. } if name == "head" => {
                self.parse_error(ErrorCode::UnexpectedStartTag, *offset);
            }
            Token::EndTag { offset, .. } => {
                self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
            }
            // "Anything else: Insert an HTML element for a 'body' start tag
            //  token with no attributes. Switch the insertion mode to
            //  'in body'. Reprocess the current token."
            _ => self.after_head_anything_else(token),
        }
    }

    fn after_head_anything_else(&mut self, token: &Token) {
        let body = Self::synthetic_start_tag("body", token.offset());
        let _ = self.insert_html_element(&body);
        self.insertion_mode = InsertionMode::InBody;
        self.reprocess_token(token);
    }

    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    fn handle_text_mode(&mut self, token: &Token) {
        match token {
            // "A character token: Insert the token's character."
            Token::Character { data, offset } => self.insert_character(*data, *offset),
            // "An end-of-file token: Parse error... Pop the current node off
            //  the stack of open elements. Switch the insertion mode to the
            //  original insertion mode and reprocess the token."
            Token::EndOfFile { offset } => {
                self.parse_error(ErrorCode::UnexpectedEndOfFile, *offset);
                let _ = self.stack_of_open_elements.pop();
                self.insertion_mode = self
                    .original_insertion_mode
                    .take()
                    .unwrap_or(InsertionMode::InBody);
                self.reprocess_token(token);
            }
            // "Any other end tag: Pop the current node off the stack of open
            //  elements. Switch the insertion mode to the original insertion
            //  mode."
            _ => {
                let _ = self.stack_of_open_elements.pop();
                self.insertion_mode = self
                    .original_insertion_mode
                    .take()
                    .unwrap_or(InsertionMode::InBody);
            }
        }
    }
}

// ===== THE "IN BODY" INSERTION MODE =====
// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)

impl HTMLParser {
    #[allow(clippy::too_many_lines)]
    fn handle_in_body_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is U+0000 NULL: Parse error. Ignore
            //  the token."
            Token::Character { data: '\0', offset } => {
                self.parse_error(ErrorCode::UnexpectedCharacter, *offset);
            }
            // "A character token that is one of U+0009, U+000A, U+000C,
            //  U+000D, or U+0020: Reconstruct the active formatting
            //  elements, if any. Insert the token's character."
            Token::Character { data, offset } if Self::is_whitespace(*data) => {
                self.reconstruct_active_formatting_elements();
                self.insert_character(*data, *offset);
            }
            // "Any other character token: Reconstruct... Insert... Set the
            //  frameset-ok flag to 'not ok'."
            Token::Character { data, offset } => {
                self.reconstruct_active_formatting_elements();
                self.insert_character(*data, *offset);
                self.frameset_ok = false;
            }
            Token::Comment { data, offset } => self.insert_comment(data, *offset),
            Token::Doctype { offset, .. } => {
                self.parse_error(ErrorCode::UnexpectedDoctype, *offset);
            }
            // "A start tag whose tag name is 'html': Parse error. If there
            //  is a template element on the stack of open elements, then
            //  ignore the token. Otherwise, for each attribute on the token,
            //  check to see if the attribute is already present on the top
            //  element of the stack of open elements. If it is not, add the
            //  attribute... to that element."
            Token::StartTag {
                name,
                attributes,
                offset,
                ..
            } if name == "html" => {
                self.parse_error(ErrorCode::UnexpectedStartTag, *offset);
                let has_template = self
                    .stack_of_open_elements
                    .iter()
                    .any(|&id| self.is_html_element(id, "template"));
                if has_template {
                    return;
                }
                if let Some(&top) = self.stack_of_open_elements.first() {
                    self.merge_attributes_into(top, attributes);
                }
            }
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script"
                        | "style" | "template" | "title"
                ) =>
            {
                self.handle_in_head_mode(token);
            }
            Token::EndTag { name, .. } if name == "template" => {
                self.handle_in_head_mode(token);
            }
            // "A start tag whose tag name is 'body': Parse error. If the
            //  second element on the stack of open elements is not a body
            //  element, if the stack of open elements has only one node on
            //  it, or if there is a template element on the stack of open
            //  elements, then ignore the token. (fragment case) Otherwise,
            //  set the frameset-ok flag to 'not ok'; then, for each
            //  attribute on the token... add the attribute."
            Token::StartTag {
                name,
                attributes,
                offset,
                ..
            } if name == "body" => {
                self.parse_error(ErrorCode::UnexpectedStartTag, *offset);
                let second = self.stack_of_open_elements.get(1).copied();
                let has_template = self
                    .stack_of_open_elements
                    .iter()
                    .any(|&id| self.is_html_element(id, "template"));
                let Some(body_id) = second.filter(|&id| self.is_html_element(id, "body")) else {
                    return;
                };
                if has_template {
                    return;
                }
                self.frameset_ok = false;
                self.merge_attributes_into(body_id, attributes);
            }
            // "A start tag whose tag name is 'frameset'"
            Token::StartTag { name, offset, .. } if name == "frameset" => {
                self.parse_error(ErrorCode::UnexpectedStartTag, *offset);
                let second = self.stack_of_open_elements.get(1).copied();
                let Some(body_id) = second.filter(|&id| self.is_html_element(id, "body")) else {
                    return;
                };
                // "If the frameset-ok flag is set to 'not ok', ignore the
                //  token."
                if !self.frameset_ok {
                    return;
                }
                // "Remove the second element on the stack of open elements
                //  from its parent node, if it has one."
                if let Some(parent) = self.tree.parent(body_id) {
                    self.tree.remove_child(parent, body_id);
                }
                // "Pop all the nodes from the bottom of the stack of open
                //  elements, from the current node up to, but not including,
                //  the root html element."
                self.stack_of_open_elements.truncate(1);
                let _ = self.insert_html_element(token);
                self.insertion_mode = InsertionMode::InFrameset;
            }
            // "An end-of-file token: If the stack of template insertion
            //  modes is not empty, then process the token using the rules
            //  for the 'in template' insertion mode. Otherwise... if there
            //  is a node in the stack of open elements that is not [in the
            //  allowed set], then this is a parse error. Stop parsing."
            Token::EndOfFile { offset } => {
                if !self.template_insertion_modes.is_empty() {
                    self.handle_in_template_mode(token);
                    return;
                }
                if self.stack_has_unexpected_open_element() {
                    self.parse_error(ErrorCode::UnexpectedEndOfFile, *offset);
                }
                self.stop_parsing();
            }
            // "An end tag whose tag name is 'body'"
            Token::EndTag { name, offset, .. } if name == "body" => {
                if !self.has_element_in_scope("body") {
                    self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
                    return;
                }
                if self.stack_has_unexpected_open_element() {
                    self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
                }
                self.insertion_mode = InsertionMode::AfterBody;
            }
            // "An end tag whose tag name is 'html': Act as described [for
            //  </body>], then reprocess the token."
            Token::EndTag { name, offset, .. } if name == "html" => {
                if !self.has_element_in_scope("body") {
                    self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
                    return;
                }
                if self.stack_has_unexpected_open_element() {
                    self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
                }
                self.insertion_mode = InsertionMode::AfterBody;
                self.reprocess_token(token);
            }
            // "A start tag whose tag name is one of: 'address', 'article',
            //  ...: If the stack of open elements has a p element in button
            //  scope, then close a p element. Insert an HTML element for the
            //  token."
            Token::StartTag { name, offset, .. }
                if matches!(
                    name.as_str(),
                    "address" | "article" | "aside" | "blockquote" | "center" | "details"
                        | "dialog" | "dir" | "div" | "dl" | "fieldset" | "figcaption"
                        | "figure" | "footer" | "header" | "hgroup" | "main" | "menu" | "nav"
                        | "ol" | "p" | "search" | "section" | "summary" | "ul"
                ) =>
            {
                if self.has_element_in_button_scope("p") {
                    self.close_a_p_element(*offset);
                }
                let _ = self.insert_html_element(token);
            }
            // "A start tag whose tag name is one of: 'h1'..'h6': ... if the
            //  current node is an HTML element whose tag name is one of
            //  'h1'..'h6', then this is a parse error; pop the current node
            //  off the stack of open elements."
            Token::StartTag { name, offset, .. }
                if matches!(name.as_str(), "h1" | "h2" | "h3" | "h4" | "h5" | "h6") =>
            {
                if self.has_element_in_button_scope("p") {
                    self.close_a_p_element(*offset);
                }
                if self.current_node().is_some_and(|id| {
                    self.is_html_element_one_of(id, &["h1", "h2", "h3", "h4", "h5", "h6"])
                }) {
                    self.parse_error(ErrorCode::UnexpectedStartTag, *offset);
                    let _ = self.stack_of_open_elements.pop();
                }
                let _ = self.insert_html_element(token);
            }
            // "A start tag whose tag name is one of: 'pre', 'listing': ...
            //  If the next token is a U+000A LINE FEED (LF) character token,
            //  then ignore that token... Set the frameset-ok flag to
            //  'not ok'."
            Token::StartTag { name, offset, .. }
                if matches!(name.as_str(), "pre" | "listing") =>
            {
                if self.has_element_in_button_scope("p") {
                    self.close_a_p_element(*offset);
                }
                let _ = self.insert_html_element(token);
                self.ignore_next_lf = true;
                self.frameset_ok = false;
            }
            // "A start tag whose tag name is 'form': If the form element
            //  pointer is not null, and there is no template element on the
            //  stack of open elements, then this is a parse error; ignore
            //  the token."
            Token::StartTag { name, offset, .. } if name == "form" => {
                let has_template = self
                    .stack_of_open_elements
                    .iter()
                    .any(|&id| self.is_html_element(id, "template"));
                if self.form_element_pointer.is_some() && !has_template {
                    self.parse_error(ErrorCode::UnexpectedStartTag, *offset);
                    return;
                }
                if self.has_element_in_button_scope("p") {
                    self.close_a_p_element(*offset);
                }
                let form_id = self.insert_html_element(token);
                if !has_template {
                    self.form_element_pointer = Some(form_id);
                }
            }
            // "A start tag whose tag name is 'li'"
            Token::StartTag { name, .. } if name == "li" => {
                self.handle_list_item_start_tag(token, &["li"]);
            }
            // "A start tag whose tag name is one of: 'dd', 'dt'"
            Token::StartTag { name, .. } if matches!(name.as_str(), "dd" | "dt") => {
                self.handle_list_item_start_tag(token, &["dd", "dt"]);
            }
            // "A start tag whose tag name is 'plaintext': ... switch the
            //  tokenizer to the PLAINTEXT state... there is no way to switch
            //  out of the PLAINTEXT state."
            Token::StartTag { name, offset, .. } if name == "plaintext" => {
                if self.has_element_in_button_scope("p") {
                    self.close_a_p_element(*offset);
                }
                let _ = self.insert_html_element(token);
                self.tokenizer.set_state(TokenizerState::PLAINTEXT);
            }
            // "A start tag whose tag name is 'button'"
            Token::StartTag { name, offset, .. } if name == "button" => {
                if self.has_element_in_scope("button") {
                    self.parse_error(ErrorCode::UnexpectedStartTag, *offset);
                    self.generate_implied_end_tags(None);
                    self.pop_until_tag("button");
                }
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
                self.frameset_ok = false;
            }
            // "An end tag whose tag name is one of: 'address', 'article',
            //  ...: If the stack of open elements does not have an element
            //  in scope that is an HTML element with the same tag name...
            //  parse error; ignore the token. Otherwise... generate implied
            //  end tags... pop elements..."
            Token::EndTag { name, offset, .. }
                if matches!(
                    name.as_str(),
                    "address" | "article" | "aside" | "blockquote" | "button" | "center"
                        | "details" | "dialog" | "dir" | "div" | "dl" | "fieldset"
                        | "figcaption" | "figure" | "footer" | "header" | "hgroup" | "listing"
                        | "main" | "menu" | "nav" | "ol" | "pre" | "search" | "section"
                        | "summary" | "ul"
                ) =>
            {
                if !self.has_element_in_scope(name) {
                    self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
                    return;
                }
                self.generate_implied_end_tags(None);
                if !self
                    .current_node()
                    .is_some_and(|id| self.is_html_element(id, name))
                {
                    self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
                }
                self.pop_until_tag(name);
            }
            // "An end tag whose tag name is 'form'"
            Token::EndTag { name, offset, .. } if name == "form" => {
                self.handle_form_end_tag(*offset);
            }
            // "An end tag whose tag name is 'p': If the stack of open
            //  elements does not have a p element in button scope, then this
            //  is a parse error; insert an HTML element for a 'p' start tag
            //  token with no attributes. Close a p element."
            Token::EndTag { name, offset, .. } if name == "p" => {
                if !self.has_element_in_button_scope("p") {
                    self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
                    let p = Self::synthetic_start_tag("p", *offset);
                    let _ = self.insert_html_element(&p);
                }
                self.close_a_p_element(*offset);
            }
            // "An end tag whose tag name is 'li'"
            Token::EndTag { name, offset, .. } if name == "li" => {
                if !self.has_element_in_list_item_scope("li") {
                    self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
                    return;
                }
                self.generate_implied_end_tags(Some("li"));
                if !self
                    .current_node()
                    .is_some_and(|id| self.is_html_element(id, "li"))
                {
                    self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
                }
                self.pop_until_tag("li");
            }
            // "An end tag whose tag name is one of: 'dd', 'dt'"
            Token::EndTag { name, offset, .. } if matches!(name.as_str(), "dd" | "dt") => {
                if !self.has_element_in_scope(name) {
                    self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
                    return;
                }
                self.generate_implied_end_tags(Some(name));
                if !self
                    .current_node()
                    .is_some_and(|id| self.is_html_element(id, name))
                {
                    self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
                }
                self.pop_until_tag(name);
            }
            // "An end tag whose tag name is one of: 'h1'..'h6'"
            Token::EndTag { name, offset, .. }
                if matches!(name.as_str(), "h1" | "h2" | "h3" | "h4" | "h5" | "h6") =>
            {
                const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];
                if !self.has_one_of_in_scope(HEADINGS) {
                    self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
                    return;
                }
                self.generate_implied_end_tags(None);
                if !self
                    .current_node()
                    .is_some_and(|id| self.is_html_element(id, name))
                {
                    self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
                }
                self.pop_until_one_of(HEADINGS);
            }
            // "A start tag whose tag name is 'a': If the list of active
            //  formatting elements contains an a element between the end of
            //  the list and the last marker... then this is a parse error;
            //  run the adoption agency algorithm for the token, then remove
            //  that element from the list... and the stack..."
            Token::StartTag { name, offset, .. } if name == "a" => {
                if let Some((_, existing)) = self.find_formatting_element("a") {
                    self.parse_error(ErrorCode::MisnestedFormattingElement, *offset);
                    let end_tag = Token::EndTag {
                        name: "a".to_string(),
                        self_closing: false,
                        attributes: Vec::new(),
                        offset: *offset,
                    };
                    let _ = self.run_adoption_agency(&end_tag);
                    self.remove_from_formatting_list(existing);
                    self.remove_from_stack(existing);
                }
                self.reconstruct_active_formatting_elements();
                let element_id = self.insert_html_element(token);
                self.push_formatting_element(element_id, token);
            }
            // "A start tag whose tag name is one of: 'b', 'big', 'code',
            //  'em', 'font', 'i', 's', 'small', 'strike', 'strong', 'tt',
            //  'u': Reconstruct the active formatting elements... Insert an
            //  HTML element for the token. Push onto the list of active
            //  formatting elements that element."
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "b" | "big" | "code" | "em" | "font" | "i" | "s" | "small" | "strike"
                        | "strong" | "tt" | "u"
                ) =>
            {
                self.reconstruct_active_formatting_elements();
                let element_id = self.insert_html_element(token);
                self.push_formatting_element(element_id, token);
            }
            // "A start tag whose tag name is 'nobr'"
            Token::StartTag { name, offset, .. } if name == "nobr" => {
                self.reconstruct_active_formatting_elements();
                if self.has_element_in_scope("nobr") {
                    self.parse_error(ErrorCode::MisnestedFormattingElement, *offset);
                    let end_tag = Token::EndTag {
                        name: "nobr".to_string(),
                        self_closing: false,
                        attributes: Vec::new(),
                        offset: *offset,
                    };
                    let _ = self.run_adoption_agency(&end_tag);
                    self.reconstruct_active_formatting_elements();
                }
                let element_id = self.insert_html_element(token);
                self.push_formatting_element(element_id, token);
            }
            // "An end tag whose tag name is one of [the formatting
            //  elements]: Run the adoption agency algorithm for the token."
            Token::EndTag { name, .. } if Self::is_formatting_tag(name) => {
                if self.run_adoption_agency(token) {
                    self.in_body_any_other_end_tag(token);
                }
            }
            // "A start tag whose tag name is one of: 'applet', 'marquee',
            //  'object': Reconstruct... Insert... Insert a marker at the end
            //  of the list of active formatting elements. Set the
            //  frameset-ok flag to 'not ok'."
            Token::StartTag { name, .. }
                if matches!(name.as_str(), "applet" | "marquee" | "object") =>
            {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
                self.insert_formatting_marker();
                self.frameset_ok = false;
            }
            // "An end tag token whose tag name is one of: 'applet',
            //  'marquee', 'object'"
            Token::EndTag { name, offset, .. }
                if matches!(name.as_str(), "applet" | "marquee" | "object") =>
            {
                if !self.has_element_in_scope(name) {
                    self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
                    return;
                }
                self.generate_implied_end_tags(None);
                if !self
                    .current_node()
                    .is_some_and(|id| self.is_html_element(id, name))
                {
                    self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
                }
                self.pop_until_tag(name);
                self.clear_formatting_elements_to_marker();
            }
            // "A start tag whose tag name is 'table': If the Document is not
            //  set to quirks mode, and the stack of open elements has a p
            //  element in button scope, then close a p element."
            Token::StartTag { name, offset, .. } if name == "table" => {
                if self.tree.document().quirks_mode != QuirksMode::Quirks
                    && self.has_element_in_button_scope("p")
                {
                    self.close_a_p_element(*offset);
                }
                let _ = self.insert_html_element(token);
                self.frameset_ok = false;
                self.insertion_mode = InsertionMode::InTable;
            }
            // "An end tag whose tag name is 'br': Parse error. Drop the
            //  attributes from the token, and act as described in the next
            //  entry; i.e. act as if this was a 'br' start tag token with no
            //  attributes."
            Token::EndTag { name, offset, .. } if name == "br" => {
                self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
                let br = Self::synthetic_start_tag("br", *offset);
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(&br);
                let _ = self.stack_of_open_elements.pop();
                self.frameset_ok = false;
            }
            // "A start tag whose tag name is one of: 'area', 'br', 'embed',
            //  'img', 'keygen', 'wbr': Reconstruct... Insert... Immediately
            //  pop the current node... Set the frameset-ok flag to
            //  'not ok'."
            Token::StartTag { name, .. }
                if matches!(name.as_str(), "area" | "br" | "embed" | "img" | "keygen" | "wbr") =>
            {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
                let _ = self.stack_of_open_elements.pop();
                self.frameset_ok = false;
            }
            // "A start tag whose tag name is 'input': ... If the token does
            //  not have an attribute with the name 'type', or if it does,
            //  but that attribute's value is not an ASCII case-insensitive
            //  match for the string 'hidden', then: set the frameset-ok flag
            //  to 'not ok'."
            Token::StartTag {
                name, attributes, ..
            } if name == "input" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
                let _ = self.stack_of_open_elements.pop();
                let hidden = attributes
                    .iter()
                    .find(|attr| attr.name == "type")
                    .is_some_and(|attr| attr.value.eq_ignore_ascii_case("hidden"));
                if !hidden {
                    self.frameset_ok = false;
                }
            }
            // "A start tag whose tag name is one of: 'param', 'source',
            //  'track': Insert an HTML element for the token. Immediately
            //  pop the current node off the stack of open elements."
            Token::StartTag { name, .. }
                if matches!(name.as_str(), "param" | "source" | "track") =>
            {
                let _ = self.insert_html_element(token);
                let _ = self.stack_of_open_elements.pop();
            }
            // "A start tag whose tag name is 'hr'"
            Token::StartTag { name, offset, .. } if name == "hr" => {
                if self.has_element_in_button_scope("p") {
                    self.close_a_p_element(*offset);
                }
                let _ = self.insert_html_element(token);
                let _ = self.stack_of_open_elements.pop();
                self.frameset_ok = false;
            }
            // "A start tag whose tag name is 'image': Parse error. Change
            //  the token's tag name to 'img' and reprocess it. (Don't ask.)"
            Token::StartTag {
                name,
                self_closing,
                attributes,
                offset,
            } if name == "image" => {
                self.parse_error(ErrorCode::UnexpectedStartTag, *offset);
                let img = Token::StartTag {
                    name: "img".to_string(),
                    self_closing: *self_closing,
                    attributes: attributes.clone(),
                    offset: *offset,
                };
                self.reprocess_token(&img);
            }
            // "A start tag whose tag name is 'textarea': ... switch the
            //  tokenizer to the RCDATA state... If the next token is a
            //  U+000A LINE FEED (LF) character token, then ignore that
            //  token."
            Token::StartTag { name, .. } if name == "textarea" => {
                let _ = self.insert_html_element(token);
                self.ignore_next_lf = true;
                self.tokenizer.set_state(TokenizerState::RCDATA);
                self.original_insertion_mode = Some(self.insertion_mode);
                self.frameset_ok = false;
                self.insertion_mode = InsertionMode::Text;
            }
            // "A start tag whose tag name is 'xmp'"
            Token::StartTag { name, offset, .. } if name == "xmp" => {
                if self.has_element_in_button_scope("p") {
                    self.close_a_p_element(*offset);
                }
                self.reconstruct_active_formatting_elements();
                self.frameset_ok = false;
                self.follow_generic_text_element_parsing_algorithm(token, TokenizerState::RAWTEXT);
            }
            // "A start tag whose tag name is 'iframe'"
            Token::StartTag { name, .. } if name == "iframe" => {
                self.frameset_ok = false;
                self.follow_generic_text_element_parsing_algorithm(token, TokenizerState::RAWTEXT);
            }
            // "A start tag whose tag name is 'noembed' (or 'noscript', if
            //  the scripting flag is enabled)"
            Token::StartTag { name, .. } if name == "noembed" => {
                self.follow_generic_text_element_parsing_algorithm(token, TokenizerState::RAWTEXT);
            }
            // "A start tag whose tag name is 'select': Reconstruct...
            //  Insert... Set the frameset-ok flag to 'not ok'. If the
            //  insertion mode is one of 'in table', 'in caption', 'in table
            //  body', 'in row', or 'in cell', then switch the insertion mode
            //  to 'in select in table'. Otherwise, switch... to 'in
            //  select'."
            Token::StartTag { name, .. } if name == "select" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
                self.frameset_ok = false;
                self.insertion_mode = if matches!(
                    self.insertion_mode,
                    InsertionMode::InTable
                        | InsertionMode::InCaption
                        | InsertionMode::InTableBody
                        | InsertionMode::InRow
                        | InsertionMode::InCell
                ) {
                    InsertionMode::InSelectInTable
                } else {
                    InsertionMode::InSelect
                };
            }
            // "A start tag whose tag name is one of: 'optgroup', 'option':
            //  If the current node is an option element, then pop the
            //  current node off the stack of open elements."
            Token::StartTag { name, .. } if matches!(name.as_str(), "optgroup" | "option") => {
                if self
                    .current_node()
                    .is_some_and(|id| self.is_html_element(id, "option"))
                {
                    let _ = self.stack_of_open_elements.pop();
                }
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
            }
            // "A start tag whose tag name is one of: 'rb', 'rtc': If the
            //  stack of open elements has a ruby element in scope, then
            //  generate implied end tags. If the current node is not now a
            //  ruby element, this is a parse error."
            Token::StartTag { name, offset, .. } if matches!(name.as_str(), "rb" | "rtc") => {
                if self.has_element_in_scope("ruby") {
                    self.generate_implied_end_tags(None);
                    if !self
                        .current_node()
                        .is_some_and(|id| self.is_html_element(id, "ruby"))
                    {
                        self.parse_error(ErrorCode::UnexpectedStartTag, *offset);
                    }
                }
                let _ = self.insert_html_element(token);
            }
            // "A start tag whose tag name is one of: 'rp', 'rt': If the
            //  stack of open elements has a ruby element in scope, then
            //  generate implied end tags, except for rtc elements. If the
            //  current node is not now a rtc element or a ruby element, this
            //  is a parse error."
            Token::StartTag { name, offset, .. } if matches!(name.as_str(), "rp" | "rt") => {
                if self.has_element_in_scope("ruby") {
                    self.generate_implied_end_tags(Some("rtc"));
                    if !self.current_node().is_some_and(|id| {
                        self.is_html_element_one_of(id, &["rtc", "ruby"])
                    }) {
                        self.parse_error(ErrorCode::UnexpectedStartTag, *offset);
                    }
                }
                let _ = self.insert_html_element(token);
            }
            // "A start tag whose tag name is 'math': Reconstruct the active
            //  formatting elements... Adjust MathML attributes... Adjust
            //  foreign attributes... Insert a foreign element for the token,
            //  in the MathML namespace."
            Token::StartTag {
                name,
                self_closing,
                attributes,
                offset,
            } if name == "math" => {
                self.reconstruct_active_formatting_elements();
                let mut attributes = attributes.clone();
                adjust_mathml_attributes(&mut attributes);
                let adjusted = Token::StartTag {
                    name: name.clone(),
                    self_closing: *self_closing,
                    attributes,
                    offset: *offset,
                };
                let _ = self.insert_foreign_element(&adjusted, Namespace::MathMl);
                // "If the token has its self-closing flag set, pop the
                //  current node... and acknowledge the token's self-closing
                //  flag."
                if *self_closing {
                    let _ = self.stack_of_open_elements.pop();
                }
            }
            // "A start tag whose tag name is 'svg'"
            Token::StartTag {
                name,
                self_closing,
                attributes,
                offset,
            } if name == "svg" => {
                self.reconstruct_active_formatting_elements();
                let mut attributes = attributes.clone();
                adjust_svg_attributes(&mut attributes);
                let adjusted = Token::StartTag {
                    name: name.clone(),
                    self_closing: *self_closing,
                    attributes,
                    offset: *offset,
                };
                let _ = self.insert_foreign_element(&adjusted, Namespace::Svg);
                if *self_closing {
                    let _ = self.stack_of_open_elements.pop();
                }
            }
            // "A start tag whose tag name is one of: 'caption', 'col',
            //  'colgroup', 'frame', 'head', 'tbody', 'td', 'tfoot', 'th',
            //  'thead', 'tr': Parse error. Ignore the token."
            Token::StartTag { name, offset, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "frame" | "head" | "tbody" | "td"
                        | "tfoot" | "th" | "thead" | "tr"
                ) =>
            {
                self.parse_error(ErrorCode::UnexpectedStartTag, *offset);
            }
            // "Any other start tag: Reconstruct the active formatting
            //  elements, if any. Insert an HTML element for the token."
            //
            // "This element will be an ordinary element."
            Token::StartTag { .. } => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
            }
            // "Any other end tag"
            Token::EndTag { .. } => self.in_body_any_other_end_tag(token),
            Token::Cdata { .. } => {
                // Rewritten into a character token before mode dispatch.
            }
        }
    }

    /// "Any other end tag: Run these steps: 1. Initialize node to be the
    /// current node... 2. Loop: If node is an HTML element with the same tag
    /// name as the token, then: generate implied end tags, except for HTML
    /// elements with the same tag name as the token; if node is not the
    /// current node, then this is a parse error; pop all the nodes from the
    /// current node up to node, including node, then stop these steps.
    /// 3. Otherwise, if node is in the special category, then this is a
    /// parse error; ignore the token, and return. 4. Set node to the
    /// previous entry in the stack of open elements. 5. Return to the step
    /// labeled loop."
    fn in_body_any_other_end_tag(&mut self, token: &Token) {
        let Token::EndTag { name, offset, .. } = token else {
            return;
        };
        for index in (0..self.stack_of_open_elements.len()).rev() {
            let node = self.stack_of_open_elements[index];
            if self.is_html_element(node, name) {
                self.generate_implied_end_tags(Some(name));
                if self.current_node() != Some(node) {
                    self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
                }
                self.pop_until_node(node);
                return;
            }
            if self.is_special_element(node) {
                self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
                return;
            }
        }
    }

    /// The shared li/dd/dt start tag steps: walk the stack looking for an
    /// open list item of the same family, closing it if found, stopping at
    /// any special element other than address, div, or p.
    fn handle_list_item_start_tag(&mut self, token: &Token, family: &[&str]) {
        let Token::StartTag { offset, .. } = token else {
            return;
        };
        // STEP 1: "Set the frameset-ok flag to 'not ok'."
        self.frameset_ok = false;

        // STEP 2-3: "Initialize node to be the current node... Loop..."
        for index in (0..self.stack_of_open_elements.len()).rev() {
            let node = self.stack_of_open_elements[index];
            if let Some(matched) = family
                .iter()
                .copied()
                .find(|&tag| self.is_html_element(node, tag))
            {
                // "Generate implied end tags, except for [the matched]
                //  elements. If the current node is not [one], then this is
                //  a parse error. Pop elements... until [it] has been
                //  popped."
                self.generate_implied_end_tags(Some(matched));
                if !self
                    .current_node()
                    .is_some_and(|id| self.is_html_element(id, matched))
                {
                    self.parse_error(ErrorCode::UnexpectedStartTag, *offset);
                }
                self.pop_until_tag(matched);
                break;
            }
            // STEP 4: "If node is in the special category, but is not an
            //          address, div, or p element, then jump to the step
            //          labeled done below."
            if self.is_special_element(node)
                && !self.is_html_element_one_of(node, &["address", "div", "p"])
            {
                break;
            }
        }

        // STEP "done": "If the stack of open elements has a p element in
        //  button scope, then close a p element. Finally, insert an HTML
        //  element for the token."
        if self.has_element_in_button_scope("p") {
            self.close_a_p_element(*offset);
        }
        let _ = self.insert_html_element(token);
    }

    /// "An end tag whose tag name is 'form'" — two paths depending on
    /// whether a template element is on the stack.
    fn handle_form_end_tag(&mut self, offset: usize) {
        let has_template = self
            .stack_of_open_elements
            .iter()
            .any(|&id| self.is_html_element(id, "template"));

        if has_template {
            // "If the stack of open elements does not have a form element in
            //  scope... parse error... Otherwise... pop elements... until a
            //  form element has been popped."
            if !self.has_element_in_scope("form") {
                self.parse_error(ErrorCode::UnexpectedEndTag, offset);
                return;
            }
            self.generate_implied_end_tags(None);
            if !self
                .current_node()
                .is_some_and(|id| self.is_html_element(id, "form"))
            {
                self.parse_error(ErrorCode::UnexpectedEndTag, offset);
            }
            self.pop_until_tag("form");
            return;
        }

        // "Let node be the element that the form element pointer is set to,
        //  or null if it is not set to an element. Set the form element
        //  pointer to null."
        let node = self.form_element_pointer.take();
        // "If node is null or if the stack of open elements does not have
        //  node in scope, then this is a parse error; return and ignore the
        //  token."
        let Some(node) = node.filter(|_| self.has_element_in_scope("form")) else {
            self.parse_error(ErrorCode::UnexpectedEndTag, offset);
            return;
        };
        // "Generate implied end tags. If the current node is not node, then
        //  this is a parse error. Remove node from the stack of open
        //  elements."
        self.generate_implied_end_tags(None);
        if self.current_node() != Some(node) {
            self.parse_error(ErrorCode::UnexpectedEndTag, offset);
        }
        self.remove_from_stack(node);
    }

    /// "If there is a node in the stack of open elements that is not either
    /// a dd element, a dt element, an li element, an optgroup element, an
    /// option element, a p element, an rb element, an rp element, an rt
    /// element, an rtc element, a tbody element, a td element, a tfoot
    /// element, a th element, a thead element, a tr element, the body
    /// element, or the html element, then this is a parse error."
    fn stack_has_unexpected_open_element(&self) -> bool {
        self.stack_of_open_elements.iter().any(|&id| {
            !self.is_html_element_one_of(
                id,
                &[
                    "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc",
                    "tbody", "td", "tfoot", "th", "thead", "tr", "body", "html",
                ],
            )
        })
    }

    /// "For each attribute on the token, check to see if the attribute is
    /// already present on the element. If it is not, add the attribute and
    /// its corresponding value to that element."
    fn merge_attributes_into(&mut self, element_id: NodeId, attributes: &[Attribute]) {
        for attr in attributes {
            if let Some(element) = self.tree.as_element_mut(element_id) {
                let _ = element.push_attribute(DomAttribute::new(
                    attr.name.clone(),
                    attr.value.clone(),
                    attr.offset,
                ));
            }
        }
    }
}

// ===== TABLE PARSING MODES =====
// [§ 13.2.6.4.9-15](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)

impl HTMLParser {
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    fn handle_in_table_mode(&mut self, token: &Token) {
        match token {
            // "A character token, if the current node is table, tbody,
            //  template, tfoot, thead, or tr element: Let the pending table
            //  character tokens be an empty list. Let the original insertion
            //  mode be the current insertion mode. Switch the insertion mode
            //  to 'in table text' and reprocess the token."
            Token::Character { .. }
                if self.current_node().is_some_and(|id| {
                    self.is_html_element_one_of(
                        id,
                        &["table", "tbody", "template", "tfoot", "thead", "tr"],
                    )
                }) =>
            {
                self.pending_table_character_tokens.clear();
                self.original_insertion_mode = Some(self.insertion_mode);
                self.insertion_mode = InsertionMode::InTableText;
                self.reprocess_token(token);
            }
            Token::Comment { data, offset } => self.insert_comment(data, *offset),
            Token::Doctype { offset, .. } => {
                self.parse_error(ErrorCode::UnexpectedDoctype, *offset);
            }
            // "A start tag whose tag name is 'caption': Clear the stack back
            //  to a table context. Insert a marker at the end of the list of
            //  active formatting elements. Insert an HTML element for the
            //  token, then switch the insertion mode to 'in caption'."
            Token::StartTag { name, .. } if name == "caption" => {
                self.clear_stack_back_to_table_context();
                self.insert_formatting_marker();
                let _ = self.insert_html_element(token);
                self.insertion_mode = InsertionMode::InCaption;
            }
            // "A start tag whose tag name is 'colgroup'"
            Token::StartTag { name, .. } if name == "colgroup" => {
                self.clear_stack_back_to_table_context();
                let _ = self.insert_html_element(token);
                self.insertion_mode = InsertionMode::InColumnGroup;
            }
            // "A start tag whose tag name is 'col': Clear the stack back to
            //  a table context. Insert an HTML element for a 'colgroup'
            //  start tag token with no attributes, then switch the insertion
            //  mode to 'in column group'. Reprocess the current token."
            Token::StartTag { name, offset, .. } if name == "col" => {
                self.clear_stack_back_to_table_context();
                let colgroup = Self::synthetic_start_tag("colgroup", *offset);
                let _ = self.insert_html_element(&colgroup);
                self.insertion_mode = InsertionMode::InColumnGroup;
                self.reprocess_token(token);
            }
            // "A start tag whose tag name is one of: 'tbody', 'tfoot',
            //  'thead'"
            Token::StartTag { name, .. }
                if matches!(name.as_str(), "tbody" | "tfoot" | "thead") =>
            {
                self.clear_stack_back_to_table_context();
                let _ = self.insert_html_element(token);
                self.insertion_mode = InsertionMode::InTableBody;
            }
            // "A start tag whose tag name is one of: 'td', 'th', 'tr':
            //  Clear the stack back to a table context. Insert an HTML
            //  element for a 'tbody' start tag token with no attributes,
            //  then switch the insertion mode to 'in table body'. Reprocess
            //  the current token."
            Token::StartTag { name, offset, .. }
                if matches!(name.as_str(), "td" | "th" | "tr") =>
            {
                self.clear_stack_back_to_table_context();
                let tbody = Self::synthetic_start_tag("tbody", *offset);
                let _ = self.insert_html_element(&tbody);
                self.insertion_mode = InsertionMode::InTableBody;
                self.reprocess_token(token);
            }
            // "A start tag whose tag name is 'table': Parse error. If the
            //  stack of open elements does not have a table element in table
            //  scope, ignore the token. Otherwise: pop elements... until a
            //  table element has been popped... Reset the insertion mode
            //  appropriately. Reprocess the token."
            Token::StartTag { name, offset, .. } if name == "table" => {
                self.parse_error(ErrorCode::UnexpectedStartTag, *offset);
                if !self.has_element_in_table_scope("table") {
                    return;
                }
                self.pop_until_tag("table");
                self.reset_insertion_mode_appropriately();
                self.reprocess_token(token);
            }
            // "An end tag whose tag name is 'table'"
            Token::EndTag { name, offset, .. } if name == "table" => {
                if !self.has_element_in_table_scope("table") {
                    self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
                    return;
                }
                self.pop_until_tag("table");
                self.reset_insertion_mode_appropriately();
            }
            // "An end tag whose tag name is one of: 'body', 'caption',
            //  'col', 'colgroup', 'html', 'tbody', 'td', 'tfoot', 'th',
            //  'thead', 'tr': Parse error. Ignore the token."
            Token::EndTag { name, offset, .. }
                if matches!(
                    name.as_str(),
                    "body" | "caption" | "col" | "colgroup" | "html" | "tbody" | "td"
                        | "tfoot" | "th" | "thead" | "tr"
                ) =>
            {
                self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
            }
            // "A start tag whose tag name is one of: 'style', 'script',
            //  'template' [or] an end tag whose tag name is 'template':
            //  Process the token using the rules for the 'in head' insertion
            //  mode."
            Token::StartTag { name, .. }
                if matches!(name.as_str(), "style" | "script" | "template") =>
            {
                self.handle_in_head_mode(token);
            }
            Token::EndTag { name, .. } if name == "template" => {
                self.handle_in_head_mode(token);
            }
            // "A start tag whose tag name is 'input': If the token does not
            //  have an attribute with the name 'type', or if it does, but
            //  that attribute's value is not an ASCII case-insensitive match
            //  for the string 'hidden', then: act as described in the
            //  'anything else' entry below. Otherwise: Parse error. Insert
            //  an HTML element for the token. Pop that input element off the
            //  stack of open elements."
            Token::StartTag {
                name,
                attributes,
                offset,
                ..
            } if name == "input" => {
                let hidden = attributes
                    .iter()
                    .find(|attr| attr.name == "type")
                    .is_some_and(|attr| attr.value.eq_ignore_ascii_case("hidden"));
                if !hidden {
                    self.in_table_anything_else(token);
                    return;
                }
                self.parse_error(ErrorCode::UnexpectedStartTag, *offset);
                let _ = self.insert_html_element(token);
                let _ = self.stack_of_open_elements.pop();
            }
            // "A start tag whose tag name is 'form': Parse error. If there
            //  is a template element on the stack of open elements, or if
            //  the form element pointer is not null, ignore the token.
            //  Otherwise: Insert an HTML element for the token, and set the
            //  form element pointer to point to the element created. Pop
            //  that form element off the stack of open elements."
            Token::StartTag { name, offset, .. } if name == "form" => {
                self.parse_error(ErrorCode::UnexpectedStartTag, *offset);
                let has_template = self
                    .stack_of_open_elements
                    .iter()
                    .any(|&id| self.is_html_element(id, "template"));
                if has_template || self.form_element_pointer.is_some() {
                    return;
                }
                let form_id = self.insert_html_element(token);
                self.form_element_pointer = Some(form_id);
                let _ = self.stack_of_open_elements.pop();
            }
            // "An end-of-file token: Process the token using the rules for
            //  the 'in body' insertion mode."
            Token::EndOfFile { .. } => self.handle_in_body_mode(token),
            _ => self.in_table_anything_else(token),
        }
    }

    /// "Anything else: Parse error. Enable foster parenting, process the
    /// token using the rules for the 'in body' insertion mode, and then
    /// disable foster parenting."
    fn in_table_anything_else(&mut self, token: &Token) {
        self.parse_error(ErrorCode::UnexpectedStartTag, token.offset());
        self.foster_parenting = true;
        self.handle_in_body_mode(token);
        self.foster_parenting = false;
    }

    /// [§ 13.2.6.4.9](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-context)
    ///
    /// "While the current node is not a table, template, or html element,
    /// pop elements from the stack of open elements."
    fn clear_stack_back_to_table_context(&mut self) {
        while let Some(&current) = self.stack_of_open_elements.last() {
            if self.is_html_element_one_of(current, &["table", "template", "html"]) {
                break;
            }
            let _ = self.stack_of_open_elements.pop();
        }
    }

    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    fn handle_in_table_text_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is U+0000 NULL: Parse error. Ignore
            //  the token."
            Token::Character { data: '\0', offset } => {
                self.parse_error(ErrorCode::UnexpectedCharacter, *offset);
            }
            // "Any other character token: Append the character token to the
            //  pending table character tokens list."
            Token::Character { .. } => {
                self.pending_table_character_tokens.push(token.clone());
            }
            // "Anything else: If any of the tokens in the pending table
            //  character tokens list are character tokens that are not ASCII
            //  whitespace, then this is a parse error: reprocess the
            //  character tokens... using the rules given in the 'anything
            //  else' entry in the 'in table' insertion mode. Otherwise,
            //  insert the characters... Switch the insertion mode to the
            //  original insertion mode and reprocess the token."
            _ => {
                let pending = std::mem::take(&mut self.pending_table_character_tokens);
                let any_non_whitespace = pending.iter().any(|pending_token| {
                    matches!(pending_token, Token::Character { data, .. } if !Self::is_whitespace(*data))
                });
                if any_non_whitespace {
                    for pending_token in &pending {
                        self.parse_error(ErrorCode::UnexpectedCharacter, pending_token.offset());
                        self.foster_parenting = true;
                        self.handle_in_body_mode(pending_token);
                        self.foster_parenting = false;
                    }
                } else {
                    for pending_token in &pending {
                        if let Token::Character { data, offset } = pending_token {
                            self.insert_character(*data, *offset);
                        }
                    }
                }
                self.insertion_mode = self
                    .original_insertion_mode
                    .take()
                    .unwrap_or(InsertionMode::InTable);
                self.reprocess_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    fn handle_in_caption_mode(&mut self, token: &Token) {
        match token {
            // "An end tag whose tag name is 'caption': If the stack of open
            //  elements does not have a caption element in table scope, this
            //  is a parse error; ignore the token. (fragment case)"
            Token::EndTag { name, offset, .. } if name == "caption" => {
                if !self.close_the_caption(*offset) {
                    self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
                }
            }
            // "A start tag whose tag name is one of: 'caption', 'col',
            //  'colgroup', 'tbody', 'td', 'tfoot', 'th', 'thead', 'tr' [or]
            //  an end tag whose tag name is 'table': Parse error. [Close the
            //  caption if one is in table scope], then reprocess the token."
            Token::StartTag { name, offset, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "td" | "tfoot" | "th" | "thead"
                        | "tr"
                ) =>
            {
                self.parse_error(ErrorCode::UnexpectedStartTag, *offset);
                if self.close_the_caption(*offset) {
                    self.reprocess_token(token);
                }
            }
            Token::EndTag { name, offset, .. } if name == "table" => {
                self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
                if self.close_the_caption(*offset) {
                    self.reprocess_token(token);
                }
            }
            // "An end tag whose tag name is one of: 'body', 'col',
            //  'colgroup', 'html', 'tbody', 'td', 'tfoot', 'th', 'thead',
            //  'tr': Parse error. Ignore the token."
            Token::EndTag { name, offset, .. }
                if matches!(
                    name.as_str(),
                    "body" | "col" | "colgroup" | "html" | "tbody" | "td" | "tfoot" | "th"
                        | "thead" | "tr"
                ) =>
            {
                self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
            }
            // "Anything else: Process the token using the rules for the
            //  'in body' insertion mode."
            _ => self.handle_in_body_mode(token),
        }
    }

    /// "Generate implied end tags. Now, if the current node is not a caption
    /// element, then this is a parse error. Pop elements from this stack
    /// until a caption element has been popped. Clear the list of active
    /// formatting elements up to the last marker. Switch the insertion mode
    /// to 'in table'."
    ///
    /// Returns false when no caption element is in table scope.
    fn close_the_caption(&mut self, offset: usize) -> bool {
        if !self.has_element_in_table_scope("caption") {
            return false;
        }
        self.generate_implied_end_tags(None);
        if !self
            .current_node()
            .is_some_and(|id| self.is_html_element(id, "caption"))
        {
            self.parse_error(ErrorCode::UnexpectedEndTag, offset);
        }
        self.pop_until_tag("caption");
        self.clear_formatting_elements_to_marker();
        self.insertion_mode = InsertionMode::InTable;
        true
    }

    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolumngroup)
    fn handle_in_column_group_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data, offset } if Self::is_whitespace(*data) => {
                self.insert_character(*data, *offset);
            }
            Token::Comment { data, offset } => self.insert_comment(data, *offset),
            Token::Doctype { offset, .. } => {
                self.parse_error(ErrorCode::UnexpectedDoctype, *offset);
            }
            Token::StartTag { name, .. } if name == "html" => {
                self.handle_in_body_mode(token);
            }
            // "A start tag whose tag name is 'col': Insert an HTML element
            //  for the token. Immediately pop the current node off the stack
            //  of open elements."
            Token::StartTag { name, .. } if name == "col" => {
                let _ = self.insert_html_element(token);
                let _ = self.stack_of_open_elements.pop();
            }
            // "An end tag whose tag name is 'colgroup': If the current node
            //  is not a colgroup element, then this is a parse error; ignore
            //  the token. Otherwise, pop the current node... and switch the
            //  insertion mode to 'in table'."
            Token::EndTag { name, offset, .. } if name == "colgroup" => {
                if !self
                    .current_node()
                    .is_some_and(|id| self.is_html_element(id, "colgroup"))
                {
                    self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
                    return;
                }
                let _ = self.stack_of_open_elements.pop();
                self.insertion_mode = InsertionMode::InTable;
            }
            // "An end tag whose tag name is 'col': Parse error. Ignore the
            //  token."
            Token::EndTag { name, offset, .. } if name == "col" => {
                self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
            }
            Token::StartTag { name, .. } if name == "template" => {
                self.handle_in_head_mode(token);
            }
            Token::EndTag { name, .. } if name == "template" => {
                self.handle_in_head_mode(token);
            }
            Token::EndOfFile { .. } => self.handle_in_body_mode(token),
            // "Anything else: If the current node is not a colgroup element,
            //  then this is a parse error; ignore the token. Otherwise, pop
            //  the current node... Switch the insertion mode to 'in table'.
            //  Reprocess the token."
            _ => {
                if !self
                    .current_node()
                    .is_some_and(|id| self.is_html_element(id, "colgroup"))
                {
                    self.parse_error(ErrorCode::UnexpectedCharacter, token.offset());
                    return;
                }
                let _ = self.stack_of_open_elements.pop();
                self.insertion_mode = InsertionMode::InTable;
                self.reprocess_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intablebody)
    fn handle_in_table_body_mode(&mut self, token: &Token) {
        match token {
            // "A start tag whose tag name is 'tr': Clear the stack back to a
            //  table body context. Insert an HTML element for the token,
            //  then switch the insertion mode to 'in row'."
            Token::StartTag { name, .. } if name == "tr" => {
                self.clear_stack_back_to_table_body_context();
                let _ = self.insert_html_element(token);
                self.insertion_mode = InsertionMode::InRow;
            }
            // "A start tag whose tag name is one of: 'th', 'td': Parse
            //  error. Clear the stack back to a table body context. Insert
            //  an HTML element for a 'tr' start tag token with no
            //  attributes, then switch the insertion mode to 'in row'.
            //  Reprocess the current token."
            Token::StartTag { name, offset, .. } if matches!(name.as_str(), "th" | "td") => {
                self.parse_error(ErrorCode::UnexpectedStartTag, *offset);
                self.clear_stack_back_to_table_body_context();
                let tr = Self::synthetic_start_tag("tr", *offset);
                let _ = self.insert_html_element(&tr);
                self.insertion_mode = InsertionMode::InRow;
                self.reprocess_token(token);
            }
            // "An end tag whose tag name is one of: 'tbody', 'tfoot',
            //  'thead'"
            Token::EndTag { name, offset, .. }
                if matches!(name.as_str(), "tbody" | "tfoot" | "thead") =>
            {
                if !self.has_element_in_table_scope(name) {
                    self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
                    return;
                }
                self.clear_stack_back_to_table_body_context();
                let _ = self.stack_of_open_elements.pop();
                self.insertion_mode = InsertionMode::InTable;
            }
            // "A start tag whose tag name is one of: 'caption', 'col',
            //  'colgroup', 'tbody', 'tfoot', 'thead' [or] an end tag whose
            //  tag name is 'table': If the stack of open elements does not
            //  have a tbody, thead, or tfoot element in table scope, this is
            //  a parse error; ignore the token. Otherwise: Clear the stack
            //  back to a table body context. Pop the current node... Switch
            //  the insertion mode to 'in table'. Reprocess the token."
            Token::StartTag { name, offset, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead"
                ) =>
            {
                self.table_body_context_switch(token, *offset);
            }
            Token::EndTag { name, offset, .. } if name == "table" => {
                self.table_body_context_switch(token, *offset);
            }
            // "An end tag whose tag name is one of: 'body', 'caption',
            //  'col', 'colgroup', 'html', 'td', 'th', 'tr': Parse error.
            //  Ignore the token."
            Token::EndTag { name, offset, .. }
                if matches!(
                    name.as_str(),
                    "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th" | "tr"
                ) =>
            {
                self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
            }
            // "Anything else: Process the token using the rules for the
            //  'in table' insertion mode."
            _ => self.handle_in_table_mode(token),
        }
    }

    fn table_body_context_switch(&mut self, token: &Token, offset: usize) {
        if !self.has_one_of_in_table_scope(&["tbody", "thead", "tfoot"]) {
            self.parse_error(ErrorCode::UnexpectedEndTag, offset);
            return;
        }
        self.clear_stack_back_to_table_body_context();
        let _ = self.stack_of_open_elements.pop();
        self.insertion_mode = InsertionMode::InTable;
        self.reprocess_token(token);
    }

    /// "While the current node is not a tbody, tfoot, thead, template, or
    /// html element, pop elements from the stack of open elements."
    fn clear_stack_back_to_table_body_context(&mut self) {
        while let Some(&current) = self.stack_of_open_elements.last() {
            if self.is_html_element_one_of(
                current,
                &["tbody", "tfoot", "thead", "template", "html"],
            ) {
                break;
            }
            let _ = self.stack_of_open_elements.pop();
        }
    }

    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inrow)
    fn handle_in_row_mode(&mut self, token: &Token) {
        match token {
            // "A start tag whose tag name is one of: 'th', 'td': Clear the
            //  stack back to a table row context. Insert an HTML element for
            //  the token, then switch the insertion mode to 'in cell'.
            //  Insert a marker at the end of the list of active formatting
            //  elements."
            Token::StartTag { name, .. } if matches!(name.as_str(), "th" | "td") => {
                self.clear_stack_back_to_table_row_context();
                let _ = self.insert_html_element(token);
                self.insertion_mode = InsertionMode::InCell;
                self.insert_formatting_marker();
            }
            // "An end tag whose tag name is 'tr': If the stack of open
            //  elements does not have a tr element in table scope, this is a
            //  parse error; ignore the token. Otherwise: Clear the stack
            //  back to a table row context. Pop the current node (which will
            //  be a tr element)... Switch the insertion mode to 'in table
            //  body'."
            Token::EndTag { name, offset, .. } if name == "tr" => {
                if !self.has_element_in_table_scope("tr") {
                    self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
                    return;
                }
                self.clear_stack_back_to_table_row_context();
                let _ = self.stack_of_open_elements.pop();
                self.insertion_mode = InsertionMode::InTableBody;
            }
            // "A start tag whose tag name is one of: 'caption', 'col',
            //  'colgroup', 'tbody', 'tfoot', 'thead', 'tr' [or] an end tag
            //  whose tag name is 'table': If the stack of open elements does
            //  not have a tr element in table scope, this is a parse error;
            //  ignore the token. Otherwise: [close the row], then reprocess
            //  the token."
            Token::StartTag { name, offset, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead" | "tr"
                ) =>
            {
                self.close_row_and_reprocess(token, *offset);
            }
            Token::EndTag { name, offset, .. } if name == "table" => {
                self.close_row_and_reprocess(token, *offset);
            }
            // "An end tag whose tag name is one of: 'tbody', 'tfoot',
            //  'thead': If the stack of open elements does not have an
            //  element in table scope that is an HTML element with the same
            //  tag name as the token, this is a parse error; ignore the
            //  token. If the stack of open elements does not have a tr
            //  element in table scope, ignore the token. Otherwise [close
            //  the row] and reprocess."
            Token::EndTag { name, offset, .. }
                if matches!(name.as_str(), "tbody" | "tfoot" | "thead") =>
            {
                if !self.has_element_in_table_scope(name) {
                    self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
                    return;
                }
                if !self.has_element_in_table_scope("tr") {
                    return;
                }
                self.clear_stack_back_to_table_row_context();
                let _ = self.stack_of_open_elements.pop();
                self.insertion_mode = InsertionMode::InTableBody;
                self.reprocess_token(token);
            }
            // "An end tag whose tag name is one of: 'body', 'caption',
            //  'col', 'colgroup', 'html', 'td', 'th': Parse error. Ignore
            //  the token."
            Token::EndTag { name, offset, .. }
                if matches!(
                    name.as_str(),
                    "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th"
                ) =>
            {
                self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
            }
            // "Anything else: Process the token using the rules for the
            //  'in table' insertion mode."
            _ => self.handle_in_table_mode(token),
        }
    }

    fn close_row_and_reprocess(&mut self, token: &Token, offset: usize) {
        if !self.has_element_in_table_scope("tr") {
            self.parse_error(ErrorCode::UnexpectedEndTag, offset);
            return;
        }
        self.clear_stack_back_to_table_row_context();
        let _ = self.stack_of_open_elements.pop();
        self.insertion_mode = InsertionMode::InTableBody;
        self.reprocess_token(token);
    }

    /// "While the current node is not a tr, template, or html element, pop
    /// elements from the stack of open elements."
    fn clear_stack_back_to_table_row_context(&mut self) {
        while let Some(&current) = self.stack_of_open_elements.last() {
            if self.is_html_element_one_of(current, &["tr", "template", "html"]) {
                break;
            }
            let _ = self.stack_of_open_elements.pop();
        }
    }

    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incell)
    fn handle_in_cell_mode(&mut self, token: &Token) {
        match token {
            // "An end tag whose tag name is one of: 'td', 'th': If the stack
            //  of open elements does not have an element in table scope that
            //  is an HTML element with the same tag name..., this is a parse
            //  error; ignore the token. Otherwise: Generate implied end
            //  tags... Pop elements... Clear the list of active formatting
            //  elements up to the last marker. Switch the insertion mode to
            //  'in row'."
            Token::EndTag { name, offset, .. } if matches!(name.as_str(), "td" | "th") => {
                if !self.has_element_in_table_scope(name) {
                    self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
                    return;
                }
                self.generate_implied_end_tags(None);
                if !self
                    .current_node()
                    .is_some_and(|id| self.is_html_element(id, name))
                {
                    self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
                }
                self.pop_until_tag(name);
                self.clear_formatting_elements_to_marker();
                self.insertion_mode = InsertionMode::InRow;
            }
            // "A start tag whose tag name is one of: 'caption', 'col',
            //  'colgroup', 'tbody', 'td', 'tfoot', 'th', 'thead', 'tr': If
            //  the stack of open elements does not have a td or th element
            //  in table scope, then this is a parse error; ignore the token.
            //  (fragment case) Otherwise, close the cell and reprocess the
            //  token."
            Token::StartTag { name, offset, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "td" | "tfoot" | "th" | "thead"
                        | "tr"
                ) =>
            {
                if !self.has_one_of_in_table_scope(&["td", "th"]) {
                    self.parse_error(ErrorCode::UnexpectedStartTag, *offset);
                    return;
                }
                self.close_the_cell(*offset);
                self.reprocess_token(token);
            }
            // "An end tag whose tag name is one of: 'body', 'caption',
            //  'col', 'colgroup', 'html': Parse error. Ignore the token."
            Token::EndTag { name, offset, .. }
                if matches!(name.as_str(), "body" | "caption" | "col" | "colgroup" | "html") =>
            {
                self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
            }
            // "An end tag whose tag name is one of: 'table', 'tbody',
            //  'tfoot', 'thead', 'tr': If the stack of open elements does
            //  not have an element in table scope that is an HTML element
            //  with the same tag name..., this is a parse error; ignore the
            //  token. Otherwise, close the cell and reprocess the token."
            Token::EndTag { name, offset, .. }
                if matches!(name.as_str(), "table" | "tbody" | "tfoot" | "thead" | "tr") =>
            {
                if !self.has_element_in_table_scope(name) {
                    self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
                    return;
                }
                self.close_the_cell(*offset);
                self.reprocess_token(token);
            }
            // "Anything else: Process the token using the rules for the
            //  'in body' insertion mode."
            _ => self.handle_in_body_mode(token),
        }
    }

    /// [§ 13.2.6.4.15](https://html.spec.whatwg.org/multipage/parsing.html#close-the-cell)
    ///
    /// "Generate implied end tags. If the current node is not now a td
    /// element or a th element, then this is a parse error. Pop elements
    /// from the stack of open elements until a td element or a th element
    /// has been popped. Clear the list of active formatting elements up to
    /// the last marker. Switch the insertion mode to 'in row'."
    fn close_the_cell(&mut self, offset: usize) {
        self.generate_implied_end_tags(None);
        if !self
            .current_node()
            .is_some_and(|id| self.is_html_element_one_of(id, &["td", "th"]))
        {
            self.parse_error(ErrorCode::UnexpectedEndTag, offset);
        }
        self.pop_until_one_of(&["td", "th"]);
        self.clear_formatting_elements_to_marker();
        self.insertion_mode = InsertionMode::InRow;
    }
}

// ===== SELECT, TEMPLATE, AND TRAILING MODES =====

impl HTMLParser {
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    fn handle_in_select_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is U+0000 NULL: Parse error. Ignore
            //  the token."
            Token::Character { data: '\0', offset } => {
                self.parse_error(ErrorCode::UnexpectedCharacter, *offset);
            }
            Token::Character { data, offset } => self.insert_character(*data, *offset),
            Token::Comment { data, offset } => self.insert_comment(data, *offset),
            Token::Doctype { offset, .. } => {
                self.parse_error(ErrorCode::UnexpectedDoctype, *offset);
            }
            Token::StartTag { name, .. } if name == "html" => {
                self.handle_in_body_mode(token);
            }
            // "A start tag whose tag name is 'option': If the current node
            //  is an option element, pop that node from the stack of open
            //  elements. Insert an HTML element for the token."
            Token::StartTag { name, .. } if name == "option" => {
                if self
                    .current_node()
                    .is_some_and(|id| self.is_html_element(id, "option"))
                {
                    let _ = self.stack_of_open_elements.pop();
                }
                let _ = self.insert_html_element(token);
            }
            // "A start tag whose tag name is 'optgroup': If the current node
            //  is an option element, pop that node... If the current node is
            //  an optgroup element, pop that node... Insert an HTML element
            //  for the token."
            Token::StartTag { name, .. } if name == "optgroup" => {
                if self
                    .current_node()
                    .is_some_and(|id| self.is_html_element(id, "option"))
                {
                    let _ = self.stack_of_open_elements.pop();
                }
                if self
                    .current_node()
                    .is_some_and(|id| self.is_html_element(id, "optgroup"))
                {
                    let _ = self.stack_of_open_elements.pop();
                }
                let _ = self.insert_html_element(token);
            }
            // "A start tag whose tag name is 'hr': [same two pops, then]
            //  Insert an HTML element for the token. Immediately pop the
            //  current node off the stack of open elements."
            Token::StartTag { name, .. } if name == "hr" => {
                if self
                    .current_node()
                    .is_some_and(|id| self.is_html_element(id, "option"))
                {
                    let _ = self.stack_of_open_elements.pop();
                }
                if self
                    .current_node()
                    .is_some_and(|id| self.is_html_element(id, "optgroup"))
                {
                    let _ = self.stack_of_open_elements.pop();
                }
                let _ = self.insert_html_element(token);
                let _ = self.stack_of_open_elements.pop();
            }
            // "An end tag whose tag name is 'optgroup': First, if the
            //  current node is an option element, and the node immediately
            //  before it in the stack of open elements is an optgroup
            //  element, then pop the current node... If the current node is
            //  an optgroup element, then pop that node... Otherwise, this is
            //  a parse error; ignore the token."
            Token::EndTag { name, offset, .. } if name == "optgroup" => {
                if self
                    .current_node()
                    .is_some_and(|id| self.is_html_element(id, "option"))
                    && self.stack_of_open_elements.len() >= 2
                    && self.is_html_element(
                        self.stack_of_open_elements[self.stack_of_open_elements.len() - 2],
                        "optgroup",
                    )
                {
                    let _ = self.stack_of_open_elements.pop();
                }
                if self
                    .current_node()
                    .is_some_and(|id| self.is_html_element(id, "optgroup"))
                {
                    let _ = self.stack_of_open_elements.pop();
                } else {
                    self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
                }
            }
            // "An end tag whose tag name is 'option': If the current node is
            //  an option element, then pop that node... Otherwise, this is a
            //  parse error; ignore the token."
            Token::EndTag { name, offset, .. } if name == "option" => {
                if self
                    .current_node()
                    .is_some_and(|id| self.is_html_element(id, "option"))
                {
                    let _ = self.stack_of_open_elements.pop();
                } else {
                    self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
                }
            }
            // "An end tag whose tag name is 'select': If the stack of open
            //  elements does not have a select element in select scope, this
            //  is a parse error; ignore the token. (fragment case)
            //  Otherwise: Pop elements... until a select element has been
            //  popped... Reset the insertion mode appropriately."
            Token::EndTag { name, offset, .. } if name == "select" => {
                if !self.has_element_in_select_scope("select") {
                    self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
                    return;
                }
                self.pop_until_tag("select");
                self.reset_insertion_mode_appropriately();
            }
            // "A start tag whose tag name is 'select': Parse error. If the
            //  stack of open elements does not have a select element in
            //  select scope, ignore the token. (fragment case) Otherwise:
            //  Pop elements... until a select element has been popped...
            //  Reset the insertion mode appropriately."
            Token::StartTag { name, offset, .. } if name == "select" => {
                self.parse_error(ErrorCode::UnexpectedStartTag, *offset);
                if !self.has_element_in_select_scope("select") {
                    return;
                }
                self.pop_until_tag("select");
                self.reset_insertion_mode_appropriately();
            }
            // "A start tag whose tag name is one of: 'input', 'keygen',
            //  'textarea': Parse error. If the stack of open elements does
            //  not have a select element in select scope, ignore the token.
            //  (fragment case) Otherwise: Pop elements... until a select
            //  element has been popped... Reset the insertion mode
            //  appropriately. Reprocess the token."
            Token::StartTag { name, offset, .. }
                if matches!(name.as_str(), "input" | "keygen" | "textarea") =>
            {
                self.parse_error(ErrorCode::UnexpectedStartTag, *offset);
                if !self.has_element_in_select_scope("select") {
                    return;
                }
                self.pop_until_tag("select");
                self.reset_insertion_mode_appropriately();
                self.reprocess_token(token);
            }
            // "A start tag whose tag name is one of: 'script', 'template'
            //  [or] an end tag whose tag name is 'template': Process the
            //  token using the rules for the 'in head' insertion mode."
            Token::StartTag { name, .. } if matches!(name.as_str(), "script" | "template") => {
                self.handle_in_head_mode(token);
            }
            Token::EndTag { name, .. } if name == "template" => {
                self.handle_in_head_mode(token);
            }
            Token::EndOfFile { .. } => self.handle_in_body_mode(token),
            // "Anything else: Parse error. Ignore the token."
            _ => {
                self.parse_error(ErrorCode::UnexpectedStartTag, token.offset());
            }
        }
    }

    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    fn handle_in_select_in_table_mode(&mut self, token: &Token) {
        match token {
            // "A start tag whose tag name is one of: 'caption', 'table',
            //  'tbody', 'tfoot', 'thead', 'tr', 'td', 'th': Parse error.
            //  Pop elements... until a select element has been popped...
            //  Reset the insertion mode appropriately. Reprocess the token."
            Token::StartTag { name, offset, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "table" | "tbody" | "tfoot" | "thead" | "tr" | "td" | "th"
                ) =>
            {
                self.parse_error(ErrorCode::UnexpectedStartTag, *offset);
                self.pop_until_tag("select");
                self.reset_insertion_mode_appropriately();
                self.reprocess_token(token);
            }
            // "An end tag whose tag name is one of [the same list]: Parse
            //  error. If the stack of open elements does not have an element
            //  in table scope that is an HTML element with the same tag
            //  name..., ignore the token. Otherwise [same as above]."
            Token::EndTag { name, offset, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "table" | "tbody" | "tfoot" | "thead" | "tr" | "td" | "th"
                ) =>
            {
                self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
                if !self.has_element_in_table_scope(name) {
                    return;
                }
                self.pop_until_tag("select");
                self.reset_insertion_mode_appropriately();
                self.reprocess_token(token);
            }
            // "Anything else: Process the token using the rules for the
            //  'in select' insertion mode."
            _ => self.handle_in_select_mode(token),
        }
    }

    /// [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)
    fn handle_in_template_mode(&mut self, token: &Token) {
        match token {
            // "A character token, a comment token, a DOCTYPE token: Process
            //  the token using the rules for the 'in body' insertion mode."
            // CDATA characters are rewritten into character tokens before
            // mode dispatch, so the arm only exists for totality.
            Token::Character { .. }
            | Token::Cdata { .. }
            | Token::Comment { .. }
            | Token::Doctype { .. } => {
                self.handle_in_body_mode(token);
            }
            // "A start tag whose tag name is one of: 'base', 'basefont',
            //  'bgsound', 'link', 'meta', 'noframes', 'script', 'style',
            //  'template', 'title' [or] an end tag whose tag name is
            //  'template': Process the token using the rules for the 'in
            //  head' insertion mode."
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script"
                        | "style" | "template" | "title"
                ) =>
            {
                self.handle_in_head_mode(token);
            }
            Token::EndTag { name, .. } if name == "template" => {
                self.handle_in_head_mode(token);
            }
            // "A start tag whose tag name is one of: 'caption', 'colgroup',
            //  'tbody', 'tfoot', 'thead': Pop the current template insertion
            //  mode... Push 'in table'... Switch the insertion mode to
            //  'in table', and reprocess the token."
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "colgroup" | "tbody" | "tfoot" | "thead"
                ) =>
            {
                self.switch_template_mode(InsertionMode::InTable, token);
            }
            // "A start tag whose tag name is 'col': [same, with 'in column
            //  group']"
            Token::StartTag { name, .. } if name == "col" => {
                self.switch_template_mode(InsertionMode::InColumnGroup, token);
            }
            // "A start tag whose tag name is 'tr': [same, with 'in table
            //  body']"
            Token::StartTag { name, .. } if name == "tr" => {
                self.switch_template_mode(InsertionMode::InTableBody, token);
            }
            // "A start tag whose tag name is one of: 'td', 'th': [same, with
            //  'in row']"
            Token::StartTag { name, .. } if matches!(name.as_str(), "td" | "th") => {
                self.switch_template_mode(InsertionMode::InRow, token);
            }
            // "Any other start tag: [same, with 'in body']"
            Token::StartTag { .. } => {
                self.switch_template_mode(InsertionMode::InBody, token);
            }
            // "Any other end tag: Parse error. Ignore the token."
            Token::EndTag { offset, .. } => {
                self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
            }
            // "An end-of-file token: If there is no template element on the
            //  stack of open elements, then stop parsing. (fragment case)
            //  Otherwise, this is a parse error. Pop elements... until a
            //  template element has been popped... Clear the list of active
            //  formatting elements up to the last marker. Pop the current
            //  template insertion mode... Reset the insertion mode
            //  appropriately. Reprocess the token."
            Token::EndOfFile { offset } => {
                let has_template = self
                    .stack_of_open_elements
                    .iter()
                    .any(|&id| self.is_html_element(id, "template"));
                if !has_template {
                    self.stop_parsing();
                    return;
                }
                self.parse_error(ErrorCode::EofInTag, *offset);
                self.pop_until_tag("template");
                self.clear_formatting_elements_to_marker();
                let _ = self.template_insertion_modes.pop();
                self.reset_insertion_mode_appropriately();
                self.reprocess_token(token);
            }
        }
    }

    fn switch_template_mode(&mut self, mode: InsertionMode, token: &Token) {
        let _ = self.template_insertion_modes.pop();
        self.template_insertion_modes.push(mode);
        self.insertion_mode = mode;
        self.reprocess_token(token);
    }

    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    fn handle_after_body_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data, .. } if Self::is_whitespace(*data) => {
                self.handle_in_body_mode(token);
            }
            // "A comment token: Insert a comment as the last child of the
            //  first element in the stack of open elements (the html
            //  element)."
            Token::Comment { data, offset } => {
                self.insert_comment_to_html_element(data, *offset);
            }
            Token::Doctype { offset, .. } => {
                self.parse_error(ErrorCode::UnexpectedDoctype, *offset);
            }
            Token::StartTag { name, .. } if name == "html" => {
                self.handle_in_body_mode(token);
            }
            // "An end tag whose tag name is 'html': If the parser was
            //  created as part of the HTML fragment parsing algorithm, this
            //  is a parse error; ignore the token. (fragment case)
            //  Otherwise, switch the insertion mode to 'after after body'."
            Token::EndTag { name, offset, .. } if name == "html" => {
                if self.fragment_context.is_some() {
                    self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
                    return;
                }
                self.insertion_mode = InsertionMode::AfterAfterBody;
            }
            Token::EndOfFile { .. } => self.stop_parsing(),
            // "Anything else: Parse error. Switch the insertion mode to
            //  'in body' and reprocess the token."
            _ => {
                self.parse_error(ErrorCode::UnexpectedCharacter, token.offset());
                self.insertion_mode = InsertionMode::InBody;
                self.reprocess_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    fn handle_in_frameset_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data, offset } if Self::is_whitespace(*data) => {
                self.insert_character(*data, *offset);
            }
            Token::Comment { data, offset } => self.insert_comment(data, *offset),
            Token::Doctype { offset, .. } => {
                self.parse_error(ErrorCode::UnexpectedDoctype, *offset);
            }
            Token::StartTag { name, .. } if name == "html" => {
                self.handle_in_body_mode(token);
            }
            Token::StartTag { name, .. } if name == "frameset" => {
                let _ = self.insert_html_element(token);
            }
            // "An end tag whose tag name is 'frameset': If the current node
            //  is the root html element, then this is a parse error; ignore
            //  the token. (fragment case) Otherwise, pop the current node...
            //  If the parser was not created as part of the HTML fragment
            //  parsing algorithm..., and the current node is no longer a
            //  frameset element, then switch the insertion mode to 'after
            //  frameset'."
            Token::EndTag { name, offset, .. } if name == "frameset" => {
                if self
                    .current_node()
                    .is_some_and(|id| self.is_html_element(id, "html"))
                {
                    self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
                    return;
                }
                let _ = self.stack_of_open_elements.pop();
                if self.fragment_context.is_none()
                    && !self
                        .current_node()
                        .is_some_and(|id| self.is_html_element(id, "frameset"))
                {
                    self.insertion_mode = InsertionMode::AfterFrameset;
                }
            }
            // "A start tag whose tag name is 'frame': Insert an HTML element
            //  for the token. Immediately pop the current node off the stack
            //  of open elements."
            Token::StartTag { name, .. } if name == "frame" => {
                let _ = self.insert_html_element(token);
                let _ = self.stack_of_open_elements.pop();
            }
            Token::StartTag { name, .. } if name == "noframes" => {
                self.handle_in_head_mode(token);
            }
            // "An end-of-file token: If the current node is not the root
            //  html element, then this is a parse error. ... Stop parsing."
            Token::EndOfFile { offset } => {
                if !self
                    .current_node()
                    .is_some_and(|id| self.is_html_element(id, "html"))
                {
                    self.parse_error(ErrorCode::EofInTag, *offset);
                }
                self.stop_parsing();
            }
            // "Anything else: Parse error. Ignore the token."
            _ => {
                self.parse_error(ErrorCode::UnexpectedCharacter, token.offset());
            }
        }
    }

    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    fn handle_after_frameset_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data, offset } if Self::is_whitespace(*data) => {
                self.insert_character(*data, *offset);
            }
            Token::Comment { data, offset } => self.insert_comment(data, *offset),
            Token::Doctype { offset, .. } => {
                self.parse_error(ErrorCode::UnexpectedDoctype, *offset);
            }
            Token::StartTag { name, .. } if name == "html" => {
                self.handle_in_body_mode(token);
            }
            Token::EndTag { name, .. } if name == "html" => {
                self.insertion_mode = InsertionMode::AfterAfterFrameset;
            }
            Token::StartTag { name, .. } if name == "noframes" => {
                self.handle_in_head_mode(token);
            }
            Token::EndOfFile { .. } => self.stop_parsing(),
            _ => {
                self.parse_error(ErrorCode::UnexpectedCharacter, token.offset());
            }
        }
    }

    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    fn handle_after_after_body_mode(&mut self, token: &Token) {
        match token {
            // "A comment token: Insert a comment as the last child of the
            //  Document object."
            Token::Comment { data, offset } => {
                self.insert_comment_to_document(data, *offset);
            }
            Token::Doctype { .. } => self.handle_in_body_mode(token),
            Token::Character { data, .. } if Self::is_whitespace(*data) => {
                self.handle_in_body_mode(token);
            }
            Token::StartTag { name, .. } if name == "html" => {
                self.handle_in_body_mode(token);
            }
            Token::EndOfFile { .. } => self.stop_parsing(),
            // "Anything else: Parse error. Switch the insertion mode to
            //  'in body' and reprocess the token."
            _ => {
                self.parse_error(ErrorCode::UnexpectedCharacter, token.offset());
                self.insertion_mode = InsertionMode::InBody;
                self.reprocess_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    fn handle_after_after_frameset_mode(&mut self, token: &Token) {
        match token {
            Token::Comment { data, offset } => {
                self.insert_comment_to_document(data, *offset);
            }
            Token::Doctype { .. } => self.handle_in_body_mode(token),
            Token::Character { data, .. } if Self::is_whitespace(*data) => {
                self.handle_in_body_mode(token);
            }
            Token::StartTag { name, .. } if name == "html" => {
                self.handle_in_body_mode(token);
            }
            Token::EndOfFile { .. } => self.stop_parsing(),
            Token::StartTag { name, .. } if name == "noframes" => {
                self.handle_in_head_mode(token);
            }
            _ => {
                self.parse_error(ErrorCode::UnexpectedCharacter, token.offset());
            }
        }
    }
}

// ===== FOREIGN CONTENT =====
// [§ 13.2.6.5](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)

impl HTMLParser {
    /// [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)
    fn process_token_in_foreign_content(&mut self, token: &Token) {
        match token {
            // "A character token that is U+0000 NULL: Parse error. Insert a
            //  U+FFFD REPLACEMENT CHARACTER character."
            Token::Character { data: '\0', offset } => {
                self.parse_error(ErrorCode::UnexpectedNullCharacter, *offset);
                self.insert_character('\u{FFFD}', *offset);
            }
            Token::Character { data, offset } if Self::is_whitespace(*data) => {
                self.insert_character(*data, *offset);
            }
            // "Any other character token: Insert the token's character. Set
            //  the frameset-ok flag to 'not ok'."
            Token::Character { data, offset } => {
                self.insert_character(*data, *offset);
                self.frameset_ok = false;
            }
            // CDATA sections are only honored here; everywhere else the
            // tokenizer already reported them as bogus comments.
            Token::Cdata { data, offset } => {
                self.insert_cdata_character(*data, *offset);
            }
            Token::Comment { data, offset } => self.insert_comment(data, *offset),
            Token::Doctype { offset, .. } => {
                self.parse_error(ErrorCode::UnexpectedDoctype, *offset);
            }
            // "A start tag whose tag name is one of [the breakout list], or
            //  'font', if the token has any attributes named 'color',
            //  'face', or 'size': Parse error. While the current node is not
            //  a MathML text integration point, an HTML integration point,
            //  or an element in the HTML namespace, pop elements... Then,
            //  reprocess the token."
            Token::StartTag {
                name,
                attributes,
                offset,
                ..
            } if BREAKOUT_TAGS.contains(&name.as_str())
                || (name == "font"
                    && attributes.iter().any(|attr| {
                        matches!(attr.name.as_str(), "color" | "face" | "size")
                    })) =>
            {
                self.parse_error(ErrorCode::UnexpectedStartTag, *offset);
                while let Some(&current) = self.stack_of_open_elements.last() {
                    let Some(element) = self.tree.as_element(current) else {
                        break;
                    };
                    if element.namespace == Namespace::Html
                        || is_mathml_text_integration_point(element)
                        || is_html_integration_point(element)
                    {
                        break;
                    }
                    let _ = self.stack_of_open_elements.pop();
                }
                self.reprocess_token(token);
            }
            // "Any other start tag: If the adjusted current node is an
            //  element in the MathML namespace, adjust MathML attributes...
            //  If the adjusted current node is an element in the SVG
            //  namespace, [adjust the tag name and] adjust SVG attributes...
            //  Adjust foreign attributes... Insert a foreign element for the
            //  token, in the same namespace as the adjusted current node.
            //  If the token has its self-closing flag set, pop the current
            //  node... and acknowledge the token's self-closing flag."
            Token::StartTag {
                name,
                attributes,
                self_closing,
                offset,
            } => {
                let namespace = self
                    .adjusted_current_node()
                    .and_then(|id| self.tree.as_element(id))
                    .map_or(Namespace::Html, |element| element.namespace);
                let mut adjusted_name = name.clone();
                let mut adjusted_attributes = attributes.clone();
                match namespace {
                    Namespace::MathMl => adjust_mathml_attributes(&mut adjusted_attributes),
                    Namespace::Svg => {
                        adjusted_name = adjust_svg_tag_name(name).to_string();
                        adjust_svg_attributes(&mut adjusted_attributes);
                    }
                    Namespace::Html => {}
                }
                let adjusted = Token::StartTag {
                    name: adjusted_name,
                    attributes: adjusted_attributes,
                    self_closing: *self_closing,
                    offset: *offset,
                };
                let _ = self.insert_foreign_element(&adjusted, namespace);
                if *self_closing {
                    let _ = self.stack_of_open_elements.pop();
                }
            }
            // "An end tag whose tag name is 'script', if the current node is
            //  an SVG script element: Pop the current node off the stack of
            //  open elements." (Script execution itself is out of scope.)
            Token::EndTag { name, .. }
                if name == "script"
                    && self.current_node().is_some_and(|id| {
                        self.tree.as_element(id).is_some_and(|element| {
                            element.namespace == Namespace::Svg
                                && element.tag_name == "script"
                        })
                    }) =>
            {
                let _ = self.stack_of_open_elements.pop();
            }
            // "Any other end tag: Run these steps: 1. Initialize node to be
            //  the current node... 2. If node's tag name, converted to ASCII
            //  lowercase, is not the same as the tag name of the token, then
            //  this is a parse error. 3. Loop: If node is the topmost
            //  element..., abort... (fragment case) 4. If node's tag name,
            //  converted to ASCII lowercase, is the same..., pop elements...
            //  up to and including node, then abort... 5. Set node to the
            //  previous entry... 6. If node is not an element in the HTML
            //  namespace, return to the step labeled loop. 7. Otherwise,
            //  process the token according to the rules given in the section
            //  corresponding to the current insertion mode in HTML content."
            Token::EndTag { name, offset, .. } => {
                if let Some(current) = self.current_node()
                    && let Some(element) = self.tree.as_element(current)
                    && element.tag_name.to_ascii_lowercase() != *name
                {
                    self.parse_error(ErrorCode::UnexpectedEndTag, *offset);
                }
                let mut index = self.stack_of_open_elements.len();
                while index > 0 {
                    index -= 1;
                    let node = self.stack_of_open_elements[index];
                    if index == 0 {
                        return;
                    }
                    let Some(element) = self.tree.as_element(node) else {
                        return;
                    };
                    if element.tag_name.to_ascii_lowercase() == *name {
                        self.pop_until_node(node);
                        return;
                    }
                    if element.namespace == Namespace::Html {
                        self.process_token(token);
                        return;
                    }
                }
            }
            Token::EndOfFile { .. } => self.process_token(token),
        }
    }
}

/// Print a DOM tree for debugging.
pub fn print_tree(tree: &DomTree, id: NodeId, indent: usize) {
    let prefix = "  ".repeat(indent);
    if let Some(node) = tree.get(id) {
        match &node.node_type {
            NodeType::Document(_) => {
                println!("{prefix}Document");
            }
            NodeType::Element(data) => {
                if data.attributes.is_empty() {
                    println!("{prefix}<{}>", data.tag_name);
                } else {
                    let attrs: Vec<String> = data
                        .attributes
                        .iter()
                        .map(|attr| {
                            if attr.value.is_empty() {
                                attr.name.clone()
                            } else {
                                format!("{}=\"{}\"", attr.name, attr.value)
                            }
                        })
                        .collect();
                    println!("{prefix}<{} {}>", data.tag_name, attrs.join(" "));
                }
            }
            NodeType::Text(data) | NodeType::Whitespace(data) => {
                let display = data.replace('\n', "\\n").replace(' ', "\u{00B7}");
                println!("{prefix}\"{display}\"");
            }
            NodeType::Cdata(data) => {
                println!("{prefix}<![CDATA[{data}]]>");
            }
            NodeType::Comment(data) => {
                println!("{prefix}<!-- {data} -->");
            }
        }
        for &child_id in tree.children(id) {
            print_tree(tree, child_id, indent + 1);
        }
    }
}
