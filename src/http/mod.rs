mod transport;

pub use transport::{ApiRequest, HttpReply, ReqwestTransport, Transport, TransportError};
