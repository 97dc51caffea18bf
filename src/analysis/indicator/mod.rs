pub mod indicator_set;
pub mod kdj;
pub mod ma;
pub mod macd;
pub mod volatility;
pub mod volume;
