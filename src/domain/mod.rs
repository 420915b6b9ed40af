// 領域層：bono 模型與 ports，不知道 trama 版面與傳輸方式

pub mod model;
pub mod ports;
