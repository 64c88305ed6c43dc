//! Doctype-based compatibility mode selection.
//!
//! [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)

use tupelo_dom::QuirksMode;

/// Public identifiers that put the document into quirks mode when matched
/// exactly (after ASCII-lowercasing).
const QUIRKS_PUBLIC_ID_EXACT: &[&str] = &[
    "-//w3o//dtd w3 html strict 3.0//en//",
    "-/w3c/dtd html 4.0 transitional/en",
    "html",
];

/// Public identifier prefixes that put the document into quirks mode.
///
/// "The public identifier starts with..."
const QUIRKS_PUBLIC_ID_PREFIXES: &[&str] = &[
    "+//silmaril//dtd html pro v0r11 19970101//",
    "-//as//dtd html 3.0 aswedit + extensions//",
    "-//advasoft ltd//dtd html 3.0 aswedit + extensions//",
    "-//ietf//dtd html 2.0 level 1//",
    "-//ietf//dtd html 2.0 level 2//",
    "-//ietf//dtd html 2.0 strict level 1//",
    "-//ietf//dtd html 2.0 strict level 2//",
    "-//ietf//dtd html 2.0 strict//",
    "-//ietf//dtd html 2.0//",
    "-//ietf//dtd html 2.1e//",
    "-//ietf//dtd html 3.0//",
    "-//ietf//dtd html 3.2 final//",
    "-//ietf//dtd html 3.2//",
    "-//ietf//dtd html 3//",
    "-//ietf//dtd html level 0//",
    "-//ietf//dtd html level 1//",
    "-//ietf//dtd html level 2//",
    "-//ietf//dtd html level 3//",
    "-//ietf//dtd html strict level 0//",
    "-//ietf//dtd html strict level 1//",
    "-//ietf//dtd html strict level 2//",
    "-//ietf//dtd html strict level 3//",
    "-//ietf//dtd html strict//",
    "-//ietf//dtd html//",
    "-//metrius//dtd metrius presentational//",
    "-//microsoft//dtd internet explorer 2.0 html strict//",
    "-//microsoft//dtd internet explorer 2.0 html//",
    "-//microsoft//dtd internet explorer 2.0 tables//",
    "-//microsoft//dtd internet explorer 3.0 html strict//",
    "-//microsoft//dtd internet explorer 3.0 html//",
    "-//microsoft//dtd internet explorer 3.0 tables//",
    "-//netscape comm. corp.//dtd html//",
    "-//netscape comm. corp.//dtd strict html//",
    "-//o'reilly and associates//dtd html 2.0//",
    "-//o'reilly and associates//dtd html extended 1.0//",
    "-//o'reilly and associates//dtd html extended relaxed 1.0//",
    "-//sq//dtd html 2.0 hotmetal + extensions//",
    "-//softquad software//dtd hotmetal pro 6.0::19990601::extensions to html 4.0//",
    "-//softquad//dtd hotmetal pro 4.0::19971010::extensions to html 4.0//",
    "-//spyglass//dtd html 2.0 extended//",
    "-//sun microsystems corp.//dtd hotjava html//",
    "-//sun microsystems corp.//dtd hotjava strict html//",
    "-//w3c//dtd html 3 1995-03-24//",
    "-//w3c//dtd html 3.2 draft//",
    "-//w3c//dtd html 3.2 final//",
    "-//w3c//dtd html 3.2//",
    "-//w3c//dtd html 3.2s draft//",
    "-//w3c//dtd html 4.0 frameset//",
    "-//w3c//dtd html 4.0 transitional//",
    "-//w3c//dtd html experimental 19960712//",
    "-//w3c//dtd html experimental 970421//",
    "-//w3c//dtd w3 html//",
    "-//w3o//dtd w3 html 3.0//",
    "-//webtechs//dtd mozilla html 2.0//",
    "-//webtechs//dtd mozilla html//",
];

/// Public identifier prefixes that put the document into limited-quirks mode.
const LIMITED_QUIRKS_PUBLIC_ID_PREFIXES: &[&str] = &[
    "-//w3c//dtd xhtml 1.0 frameset//",
    "-//w3c//dtd xhtml 1.0 transitional//",
];

/// Public identifier prefixes that depend on the system identifier:
/// quirks when the system identifier is missing, limited-quirks when present.
const SYSTEM_DEPENDENT_PUBLIC_ID_PREFIXES: &[&str] = &[
    "-//w3c//dtd html 4.01 frameset//",
    "-//w3c//dtd html 4.01 transitional//",
];

/// [§ 13.2.6.4.1](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
///
/// Determine the document's compatibility mode from a doctype token.
///
/// "Then, if the document is not an iframe srcdoc document, and the parser
/// cannot change the mode flag is false, and the DOCTYPE token matches one of
/// the conditions in the following list, then set the Document to quirks
/// mode..."
#[must_use]
pub fn quirks_mode_from_doctype(
    name: Option<&str>,
    public_identifier: Option<&str>,
    system_identifier: Option<&str>,
    force_quirks: bool,
) -> QuirksMode {
    // "The force-quirks flag is set to on."
    // "The name is not 'html'."
    if force_quirks || name != Some("html") {
        return QuirksMode::Quirks;
    }

    // Identifier comparisons are ASCII case-insensitive.
    let public = public_identifier.map(str::to_ascii_lowercase);
    let system = system_identifier.map(str::to_ascii_lowercase);

    // "The system identifier is set to:
    //  'http://www.ibm.com/data/dtd/v11/ibmxhtml1-transitional.dtd'"
    if system.as_deref() == Some("http://www.ibm.com/data/dtd/v11/ibmxhtml1-transitional.dtd") {
        return QuirksMode::Quirks;
    }

    if let Some(public) = public.as_deref() {
        if QUIRKS_PUBLIC_ID_EXACT.contains(&public) {
            return QuirksMode::Quirks;
        }
        if QUIRKS_PUBLIC_ID_PREFIXES
            .iter()
            .any(|prefix| public.starts_with(prefix))
        {
            return QuirksMode::Quirks;
        }
        // "The public identifier starts with '-//W3C//DTD HTML 4.01 Frameset//'
        //  and the system identifier is missing" -> quirks;
        // with a system identifier present -> limited-quirks.
        if SYSTEM_DEPENDENT_PUBLIC_ID_PREFIXES
            .iter()
            .any(|prefix| public.starts_with(prefix))
        {
            return if system.is_none() {
                QuirksMode::Quirks
            } else {
                QuirksMode::LimitedQuirks
            };
        }
        if LIMITED_QUIRKS_PUBLIC_ID_PREFIXES
            .iter()
            .any(|prefix| public.starts_with(prefix))
        {
            return QuirksMode::LimitedQuirks;
        }
    }

    QuirksMode::NoQuirks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modern_doctype_is_no_quirks() {
        assert_eq!(
            quirks_mode_from_doctype(Some("html"), None, None, false),
            QuirksMode::NoQuirks
        );
    }

    #[test]
    fn test_missing_name_is_quirks() {
        assert_eq!(
            quirks_mode_from_doctype(None, None, None, false),
            QuirksMode::Quirks
        );
    }

    #[test]
    fn test_force_quirks_flag() {
        assert_eq!(
            quirks_mode_from_doctype(Some("html"), None, None, true),
            QuirksMode::Quirks
        );
    }

    #[test]
    fn test_html_3_2_is_quirks() {
        assert_eq!(
            quirks_mode_from_doctype(Some("html"), Some("-//W3C//DTD HTML 3.2 Final//EN"), None, false),
            QuirksMode::Quirks
        );
    }

    #[test]
    fn test_xhtml_1_1_is_no_quirks() {
        assert_eq!(
            quirks_mode_from_doctype(
                Some("html"),
                Some("-//W3C//DTD XHTML 1.1//EN"),
                Some("http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd"),
                false
            ),
            QuirksMode::NoQuirks
        );
    }

    #[test]
    fn test_xhtml_transitional_is_limited_quirks() {
        assert_eq!(
            quirks_mode_from_doctype(
                Some("html"),
                Some("-//W3C//DTD XHTML 1.0 Transitional//EN"),
                None,
                false
            ),
            QuirksMode::LimitedQuirks
        );
    }

    #[test]
    fn test_html_4_01_transitional_depends_on_system_id() {
        let public = Some("-//W3C//DTD HTML 4.01 Transitional//EN");
        assert_eq!(
            quirks_mode_from_doctype(Some("html"), public, None, false),
            QuirksMode::Quirks
        );
        assert_eq!(
            quirks_mode_from_doctype(
                Some("html"),
                public,
                Some("http://www.w3.org/TR/html4/loose.dtd"),
                false
            ),
            QuirksMode::LimitedQuirks
        );
    }

    #[test]
    fn test_identifier_comparison_is_case_insensitive() {
        assert_eq!(
            quirks_mode_from_doctype(Some("html"), Some("-//w3c//dtd html 3.2 final//en"), None, false),
            QuirksMode::Quirks
        );
    }
}
