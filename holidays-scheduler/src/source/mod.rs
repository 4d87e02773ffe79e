mod nager;

pub use nager::NagerClient;
