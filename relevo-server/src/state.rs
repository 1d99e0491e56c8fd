//! Application state for relevo-server

use aws_sdk_s3::Client as S3Client;
use aws_sdk_sesv2::Client as SesClient;
use sqlx::PgPool;

use crate::auth::rate_limit::RateLimiter;
use crate::config::Config;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// AWS S3 client (payroll documents)
    pub s3: S3Client,
    /// S3 bucket for payroll documents
    pub payroll_bucket: String,
    /// AWS SES client for notification emails
    pub ses: SesClient,
    /// SES sender email address
    pub ses_from_email: String,
    /// JWT signing secret
    pub jwt_secret: String,
    /// Default IANA timezone for time-punch queries
    pub default_timezone: chrono_tz::Tz,
    /// Rate limiter for login/registration routes
    pub rate_limiter: RateLimiter,
}

impl AppState {
    /// Create a new AppState: connect, migrate, wire AWS clients.
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let s3 = S3Client::new(&aws_config);

        let ses = if let Ok(ses_region) = std::env::var("SES_REGION") {
            let ses_config = aws_config
                .to_builder()
                .region(aws_config::Region::new(ses_region))
                .build();
            SesClient::new(&ses_config)
        } else {
            SesClient::new(&aws_config)
        };

        let default_timezone = config
            .default_timezone
            .parse::<chrono_tz::Tz>()
            .map_err(|_| format!("Unknown DEFAULT_TIMEZONE: {}", config.default_timezone))?;

        Ok(Self {
            pool,
            s3,
            payroll_bucket: config.payroll_s3_bucket.clone(),
            ses,
            ses_from_email: config.ses_from_email.clone(),
            jwt_secret: config.jwt_secret.clone(),
            default_timezone,
            rate_limiter: RateLimiter::new(),
        })
    }
}
