//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` and only see driving ports, so they
//! can be exercised with mocks and no I/O.

use std::sync::Arc;

use crate::domain::ports::{DashboardQuery, NoteGeneration, SignIn, UploadAuthorizer};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub uploads: Arc<dyn UploadAuthorizer>,
    pub notes: Arc<dyn NoteGeneration>,
    pub dashboard: Arc<dyn DashboardQuery>,
    pub sign_in: Arc<dyn SignIn>,
}

impl HttpState {
    pub fn new(
        uploads: Arc<dyn UploadAuthorizer>,
        notes: Arc<dyn NoteGeneration>,
        dashboard: Arc<dyn DashboardQuery>,
        sign_in: Arc<dyn SignIn>,
    ) -> Self {
        Self {
            uploads,
            notes,
            dashboard,
            sign_in,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Builders for handler tests: every port defaults to a mock that
    //! panics when called.

    use super::*;
    use crate::domain::ports::{
        MockDashboardQuery, MockNoteGeneration, MockSignIn, MockUploadAuthorizer,
    };

    #[derive(Default)]
    pub(crate) struct StateBuilder {
        pub uploads: MockUploadAuthorizer,
        pub notes: MockNoteGeneration,
        pub dashboard: MockDashboardQuery,
        pub sign_in: MockSignIn,
    }

    impl StateBuilder {
        pub(crate) fn build(self) -> actix_web::web::Data<HttpState> {
            actix_web::web::Data::new(HttpState::new(
                Arc::new(self.uploads),
                Arc::new(self.notes),
                Arc::new(self.dashboard),
                Arc::new(self.sign_in),
            ))
        }
    }
}
