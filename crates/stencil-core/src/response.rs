//! HTTP response sink used by [`Templates::render_http`].
//!
//! [`Templates::render_http`]: crate::templates::Templates::render_http

use std::io;

use http::{HeaderMap, Response};

/// An HTTP response under construction: headers plus a body writer.
///
/// Status is never touched by the dispatcher; whatever the sink defaults to
/// (200 for [`http::Response`]) is what the client sees.
pub trait ResponseSink {
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Append `bytes` to the response body.
    fn write_body(&mut self, bytes: &[u8]) -> io::Result<()>;
}

impl ResponseSink for Response<Vec<u8>> {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        Response::headers_mut(self)
    }

    fn write_body(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.body_mut().extend_from_slice(bytes);
        Ok(())
    }
}
