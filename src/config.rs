use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Search radius used by nearest-driver dispatch.
    pub dispatch_radius_km: f64,
    /// Stops per route when the batch planner is not given a limit.
    pub default_route_size: usize,
    /// Capacity of the broadcast channel behind the live event stream.
    pub event_buffer: usize,
    pub seed_demo_data: bool,
    pub body_limit_bytes: usize,
    pub concurrency_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            dispatch_radius_km: 5.0,
            default_route_size: 5,
            event_buffer: 256,
            seed_demo_data: true,
            body_limit_bytes: 1024 * 1024,
            concurrency_limit: 100,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        let host = env::var("APP_HOST").unwrap_or(defaults.host);
        let port = parse_var("APP_PORT").unwrap_or(defaults.port);
        let dispatch_radius_km = parse_var::<f64>("DISPATCH_RADIUS_KM")
            .filter(|r| *r > 0.0)
            .unwrap_or(defaults.dispatch_radius_km);
        let default_route_size = parse_var::<usize>("DEFAULT_ROUTE_SIZE")
            .filter(|n| *n > 0)
            .unwrap_or(defaults.default_route_size);
        let event_buffer = parse_var::<usize>("EVENT_BUFFER")
            .filter(|n| *n > 0)
            .unwrap_or(defaults.event_buffer);
        let seed_demo_data = parse_var("SEED_DEMO_DATA").unwrap_or(defaults.seed_demo_data);
        let body_limit_bytes = parse_var("BODY_LIMIT_BYTES").unwrap_or(defaults.body_limit_bytes);
        let concurrency_limit = parse_var::<usize>("CONCURRENCY_LIMIT")
            .filter(|n| *n > 0)
            .unwrap_or(defaults.concurrency_limit);

        if host.trim().is_empty() {
            anyhow::bail!("APP_HOST must not be empty");
        }

        Ok(Self {
            host,
            port,
            dispatch_radius_km,
            default_route_size,
            event_buffer,
            seed_demo_data,
            body_limit_bytes,
            concurrency_limit,
        })
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}
