pub const SCHEMA: &str = r#"
-- scalar keys (e.g. report:count)
CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- hash records: one row per (key, field)
CREATE TABLE IF NOT EXISTS hash (
    key TEXT NOT NULL,
    field TEXT NOT NULL,
    value TEXT NOT NULL,
    PRIMARY KEY (key, field)
);

CREATE INDEX IF NOT EXISTS idx_hash_key ON hash(key);
"#;
