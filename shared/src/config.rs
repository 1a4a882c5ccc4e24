use anyhow::Result;
use std::env;

pub struct AppConfig {
    pub database: DatabaseConfig,
    pub pricing: PricingConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        let database = DatabaseConfig {
            host: env::var("DATABASE_HOST")?,
            port: env::var("DATABASE_PORT")?.parse::<u16>()?,
            username: env::var("DATABASE_USERNAME")?,
            password: env::var("DATABASE_PASSWORD")?,
            database: env::var("DATABASE_NAME")?,
        };
        let pricing = PricingConfig::from_env()?;
        Ok(Self { database, pricing })
    }
}

pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

/// 料金計算の設定値。
/// レート表をグローバルに持たず、構築時に料金エンジンへ渡す。
#[derive(Debug, Clone)]
pub struct PricingConfig {
    /// 税率（例: 0.16 = 16%）
    pub tax_rate: f64,
    /// サービス手数料率（例: 0.03 = 3%）
    pub service_fee_rate: f64,
    /// ピーク時間帯（開始時・終了時の組、[from, to) で判定）
    pub peak_hour_ranges: Vec<(u32, u32)>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tax_rate: 0.16,
            service_fee_rate: 0.03,
            peak_hour_ranges: vec![(6, 8), (18, 22)],
        }
    }
}

impl PricingConfig {
    /// 税率・手数料率は環境変数で上書きできる。ピーク時間帯は固定。
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(v) = env::var("PRICING_TAX_RATE") {
            config.tax_rate = v.parse::<f64>()?;
        }
        if let Ok(v) = env::var("PRICING_SERVICE_FEE_RATE") {
            config.service_fee_rate = v.parse::<f64>()?;
        }
        Ok(config)
    }
}
