pub mod config;
pub mod skiplist;

// Публичный экспорт всех типов ошибок из вложенных модулей, чтобы упростить
// доступ к ним из внешнего кода.
pub use config::*;
pub use skiplist::*;
