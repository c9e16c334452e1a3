//! Builders wiring outbound adapters into the HTTP state.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use mockable::DefaultClock;
use tracing::info;

use notegen::domain::ports::{CreditLedger, IdentityProvider, NoteGenerator, ObjectStorage};
use notegen::domain::{
    DashboardService, NoteGenerationService, SignInService, UploadAuthorizationService,
};
use notegen::inbound::http::state::HttpState;
use notegen::outbound::generation::{GeminiConfig, GeminiHttpGenerator};
use notegen::outbound::identity::GoogleTokenVerifier;
use notegen::outbound::persistence::{
    DbPool, DieselCreditLedger, PoolConfig, run_pending_migrations,
};
use notegen::outbound::storage::{S3ObjectStorage, S3Settings};
use notegen::settings::AppSettings;

/// Tunables applied to the domain services.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ServiceOptions {
    pub(crate) initial_credits: u32,
    pub(crate) upload_ttl: Duration,
}

impl From<&AppSettings> for ServiceOptions {
    fn from(settings: &AppSettings) -> Self {
        Self {
            initial_credits: settings.initial_credits,
            upload_ttl: settings.upload_ttl(),
        }
    }
}

/// Concrete driven adapters for production.
pub(crate) struct Adapters {
    pub(crate) ledger: Arc<DieselCreditLedger>,
    pub(crate) storage: Arc<S3ObjectStorage>,
    pub(crate) generator: Arc<GeminiHttpGenerator>,
    pub(crate) identity: Arc<GoogleTokenVerifier>,
}

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    io::Error::other(format!("{context}: {err}"))
}

/// Connect every driven adapter described by `settings`.
///
/// Migrations run before the pool is built so the ledger never sees an
/// outdated schema.
///
/// # Errors
///
/// Returns [`io::Error`] when a required setting is missing or a backing
/// service cannot be initialised.
pub(crate) async fn connect_adapters(settings: &AppSettings) -> io::Result<Adapters> {
    let database_url = settings
        .database_url()
        .map_err(|err| startup_error("database", err))?;
    run_pending_migrations(database_url)
        .await
        .map_err(|err| startup_error("migrations", err))?;
    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(settings.pool_size))
        .await
        .map_err(|err| startup_error("database pool", err))?;

    let storage = S3ObjectStorage::connect(S3Settings {
        bucket: settings
            .s3_bucket()
            .map_err(|err| startup_error("object storage", err))?
            .to_owned(),
        region: settings.s3_region().to_owned(),
        endpoint: settings.s3_endpoint.clone(),
    })
    .await;

    let generator = GeminiHttpGenerator::new(GeminiConfig {
        api_key: settings
            .gemini_api_key()
            .map_err(|err| startup_error("note generator", err))?
            .to_owned(),
        model: settings.gemini_model().to_owned(),
        base_url: settings.gemini_base_url().to_owned(),
        prompt: settings.prompt().to_owned(),
        timeout: settings.http_timeout(),
    })
    .map_err(|err| startup_error("note generator", err))?;

    let identity = GoogleTokenVerifier::new(
        settings.tokeninfo_url(),
        settings
            .google_client_id()
            .map_err(|err| startup_error("identity provider", err))?,
        settings.http_timeout(),
    )
    .map_err(|err| startup_error("identity provider", err))?;

    info!(model = settings.gemini_model(), "adapters connected");
    Ok(Adapters {
        ledger: Arc::new(DieselCreditLedger::new(pool)),
        storage: Arc::new(storage),
        generator: Arc::new(generator),
        identity: Arc::new(identity),
    })
}

/// Assemble the domain services over the given driven ports.
pub(crate) fn build_http_state<L, S, G, P>(
    ledger: Arc<L>,
    storage: Arc<S>,
    generator: Arc<G>,
    identity: Arc<P>,
    options: ServiceOptions,
) -> web::Data<HttpState>
where
    L: CreditLedger + 'static,
    S: ObjectStorage + 'static,
    G: NoteGenerator + 'static,
    P: IdentityProvider + 'static,
{
    let uploads = UploadAuthorizationService::new(storage.clone(), Arc::new(DefaultClock))
        .with_ttl(options.upload_ttl);
    let notes = NoteGenerationService::new(ledger.clone(), storage, generator);
    let dashboard = DashboardService::new(ledger.clone());
    let sign_in =
        SignInService::new(ledger, identity).with_initial_credits(options.initial_credits);

    web::Data::new(HttpState::new(
        Arc::new(uploads),
        Arc::new(notes),
        Arc::new(dashboard),
        Arc::new(sign_in),
    ))
}

impl Adapters {
    pub(crate) fn into_http_state(self, options: ServiceOptions) -> web::Data<HttpState> {
        build_http_state(
            self.ledger,
            self.storage,
            self.generator,
            self.identity,
            options,
        )
    }
}
