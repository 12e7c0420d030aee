pub mod loss;
pub mod score;

pub use loss::Loss;
pub use score::Score;
