use std::env;
use std::time::Duration;

use diesel::PgConnection;
use diesel::r2d2::ConnectionManager;

pub type Pool = r2d2::Pool<ConnectionManager<PgConnection>>;

#[derive(Clone)]
pub struct Config {
    host: String,
    port: u16,
    user: String,
    password: String,
    db: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: 5432,
            user: String::from("postgres"),
            password: String::from("postgres"),
            db: String::from("discovery"),
        }
    }
}

impl Config {
    pub fn env() -> super::Result<Self> {
        let host = env::var("POSTGRES_HOST")?;
        let port = env::var("POSTGRES_PORT")?.parse()?;
        let user = env::var("POSTGRES_USER")?;
        let password = env::var("POSTGRES_PASSWORD")?;
        let db = env::var("POSTGRES_DB")?;
        Ok(Self {
            host,
            port,
            user,
            password,
            db,
        })
    }

    fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.db
        )
    }

    pub fn connect(&self) -> Pool {
        let manager = ConnectionManager::<PgConnection>::new(self.url());

        match r2d2::Pool::builder()
            .connection_timeout(Duration::from_secs(5))
            .build(manager)
        {
            Ok(pool) => pool,
            Err(e) => panic!("Failed to connect to Postgres: {e}"),
        }
    }
}
