pub mod body;
pub mod codec;
pub mod fetcher;

pub use body::read_body;
pub use codec::UrlCodec;
pub use fetcher::ReqwestFetcher;
