pub mod ast;
pub mod config;
pub mod error;
pub mod formatter;
pub mod i18n;
pub mod lexer;
pub mod matcher;
pub mod parser;
pub mod protocol;
pub mod suggest;

// ========================================
// 主要APIの再エクスポート
// ========================================

pub use config::{load_config, LayoutConfig};
pub use error::{ErrorCode, SqlFmtError};
pub use formatter::{format, format_document, format_range, format_source, format_text};
pub use protocol::{
    DocumentFormattingParams, DocumentRangeFormattingParams, FormattingOptions, Position, Range,
    TextEdit,
};
