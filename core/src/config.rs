
#[serde_inline_default::serde_inline_default]
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize, serde_default::DefaultFromSerde)]
pub struct Config {
	#[serde(default)]
	pub http: HttpConfig,

	#[serde(default)]
	pub datasource: DatasourceConfig,

	/// record kinds which can be followed, resolved by table lookups
	#[serde(default)]
	pub kinds: Vec<KindConfig>,
}

#[serde_inline_default::serde_inline_default]
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize, serde_default::DefaultFromSerde)]
pub struct HttpConfig {
	/// prefix prepended to generated follow/unfollow urls, may be a full url
	#[serde(default)]
	pub base_url: String,

	/// query parameter holding the url to go back to after processing
	#[serde_inline_default("next".into())]
	pub redirect_field: String,

	/// header set by a trusted proxy carrying the authenticated user id
	#[serde_inline_default("x-remote-user".into())]
	pub user_header: String,

	/// where to send anonymous users, they get a plain 401 if unset
	#[serde(default)]
	pub login_url: Option<String>,
}

#[serde_inline_default::serde_inline_default]
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize, serde_default::DefaultFromSerde)]
pub struct DatasourceConfig {
	#[serde_inline_default("sqlite://./follow.db?mode=rwc".into())]
	pub connection_string: String,

	#[serde_inline_default(32)]
	pub max_connections: u32,

	#[serde_inline_default(1)]
	pub min_connections: u32,

	#[serde_inline_default(90u64)]
	pub connect_timeout_seconds: u64,

	#[serde_inline_default(30u64)]
	pub acquire_timeout_seconds: u64,

	#[serde_inline_default(10u64)]
	pub slow_query_warn_seconds: u64,

	#[serde_inline_default(true)]
	pub slow_query_warn_enable: bool,
}

#[serde_inline_default::serde_inline_default]
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct KindConfig {
	/// kind tag as it appears in urls and in the follows table
	pub name: String,

	pub table: String,

	#[serde_inline_default("id".into())]
	pub key: String,

	/// column type of `key`, ids are parsed accordingly before querying
	#[serde(default)]
	pub key_type: KeyType,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
	#[default]
	Integer,
	Text,
}

impl Config {
	pub fn load(path: Option<&std::path::PathBuf>) -> Self {
		let Some(cfg_path) = path else { return Config::default() };
		match std::fs::read_to_string(cfg_path) {
			Ok(x) => match toml::from_str(&x) {
				Ok(cfg) => return cfg,
				Err(e) => tracing::error!("failed parsing config file: {e}"),
			},
			Err(e) => tracing::error!("failed reading config file: {e}"),
		}
		Config::default()
	}
}
