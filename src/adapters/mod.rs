// 轉接層：ports 的具體實作（程序傳輸、REST 介面）

pub mod http_transport;
pub mod rest;
