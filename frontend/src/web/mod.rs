//! 浏览器适配层
//!
//! 把核心库的抽象接到浏览器 API 上：fetch、localStorage、History 与文件读取。

pub mod file;
mod http;
pub mod router;
mod storage;

pub use http::FetchClient;
pub use storage::BrowserStore;
