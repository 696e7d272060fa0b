// Central place for UI strings and other non-localized constants.
// Keep these out of gui.rs to reduce duplication and make tweaks safer.

// English UI strings (EN_ prefix to make future localization easier)
pub const EN_APP_TITLE: &str = "JSON Form Editor";

pub const EN_BTN_OPEN: &str = "Load File...";
pub const EN_BTN_SAVE_AS: &str = "Save As...";
pub const EN_BTN_TOGGLE_THEME: &str = "Theme";
pub const EN_BTN_CLEAR: &str = "Clear";

pub const EN_HOME_HEADING: &str = "JSON Form Editor";
pub const EN_HOME_INSTRUCTIONS: &str = "Load a .json file to edit its top-level fields.";

pub const EN_FILE_FILTER: &str = "JSON files";

pub const EN_LITERAL_NULL: &str = "null";
pub const EN_EMPTY: &str = "";

// Written verbatim when saving before any file has been loaded.
pub const EMPTY_DOC_TEXT: &str = "{\n}";

// Newline constants (used for save formatting; keep out of doc/value code).
pub const NL_LF: &str = "\n";
pub const NL_CRLF: &str = "\r\n";
