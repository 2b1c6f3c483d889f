pub mod banner;
pub mod colors;
pub mod interrupt;
pub mod logging;
pub mod print;
pub mod prompt;
pub mod spinner;
