mod side;
mod trade;

pub use side::Side;
pub use trade::Trade;
