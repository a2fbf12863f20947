//! Metadata Injector (spec §4.2): attaches the session identifier as the
//! `id` header on every outgoing call. Adapted from the teacher's
//! `config::interceptor::Interceptor` wrap-the-call shape to tonic's own
//! `tonic::service::Interceptor` contract, since the generated stubs expect
//! the latter directly.

use std::sync::Arc;

use tonic::metadata::AsciiMetadataValue;
use tonic::service::Interceptor;
use tonic::{Request, Status};

use crate::session::SessionIdentity;

/// Clone of a tonic interceptor is cheap: it only carries an `Arc` to the
/// shared session, never the session state itself.
#[derive(Clone)]
pub struct MetadataInjector {
    session: Arc<SessionIdentity>,
}

impl MetadataInjector {
    pub fn new(session: Arc<SessionIdentity>) -> Self {
        Self { session }
    }
}

impl Interceptor for MetadataInjector {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        let id = self
            .session
            .current()
            .ok_or_else(|| Status::unauthenticated("client is not connected"))?;

        let value = AsciiMetadataValue::try_from(id.to_string())
            .map_err(|_| Status::internal("session id is not valid ASCII metadata"))?;
        request.metadata_mut().insert("id", value);
        Ok(request)
    }
}
