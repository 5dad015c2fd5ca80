mod book;
mod candle;
mod side;
mod ticker;
mod trade;

pub use book::{BookLevel, BookSide, OrderBookSnapshot};
pub use candle::{Candle, CandleInterval};
pub use side::Side;
pub use ticker::TickerStats;
pub use trade::Trade;
