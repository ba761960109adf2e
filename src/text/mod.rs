// Text processing — stemming and word-frequency tables.

pub mod normalize;
pub mod stemmer;
