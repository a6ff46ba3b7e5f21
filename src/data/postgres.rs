//! PostgreSQL-backed material store.
//!
//! Every call opens its own connection and closes it before returning, on
//! success and failure alike. Connections are not pooled and nothing read
//! here is cached between calls: each request sees the table as it is now.

use async_trait::async_trait;
use sqlx::{postgres::PgConnectOptions, ConnectOptions, Connection, PgConnection};
use tracing::{error, info, instrument, warn};

use crate::{
    data::{MaterialHistory, MaterialStore, RawObservation},
    error::{ForecastError, Result},
};

const HISTORY_QUERY: &str = r#"
    SELECT "date"::text AS ds, "quantity"::text AS y
    FROM material_data
    WHERE "material_id" = $1
    ORDER BY "date" ASC
"#;

const PRICE_QUERY: &str = r#"
    SELECT "price"::float8 AS price
    FROM material_data
    WHERE "material_id" = $1 AND "price" > 0
    ORDER BY "date" DESC
    LIMIT 1
"#;

#[derive(Debug, Clone)]
pub struct PgStore {
    options: PgConnectOptions,
}

impl PgStore {
    pub fn new(options: PgConnectOptions) -> Self {
        Self { options }
    }

    async fn query(conn: &mut PgConnection, material_id: &str) -> Result<MaterialHistory> {
        let rows: Vec<(Option<String>, Option<String>)> = sqlx::query_as(HISTORY_QUERY)
            .bind(material_id)
            .fetch_all(&mut *conn)
            .await?;
        if rows.is_empty() {
            return Err(ForecastError::NotFound(material_id.to_string()));
        }

        let price: Option<(Option<f64>,)> = sqlx::query_as(PRICE_QUERY)
            .bind(material_id)
            .fetch_optional(&mut *conn)
            .await?;

        let rows = rows
            .into_iter()
            .map(|(date, quantity)| RawObservation {
                date: date.unwrap_or_default(),
                quantity: quantity.unwrap_or_default(),
            })
            .collect();
        Ok(MaterialHistory::new(rows, price.and_then(|(p,)| p)))
    }
}

#[async_trait]
impl MaterialStore for PgStore {
    #[instrument(skip(self))]
    async fn load_history(&self, material_id: &str) -> Result<MaterialHistory> {
        let mut conn = self.options.connect().await.map_err(|err| {
            error!(%err, "database connection error");
            ForecastError::Connectivity
        })?;

        let outcome = Self::query(&mut conn, material_id).await;
        if let Err(err) = conn.close().await {
            warn!(%err, "closing database connection failed");
        }

        if let Ok(history) = &outcome {
            info!(rows = history.rows.len(), "loaded material history");
        }
        outcome
    }
}
