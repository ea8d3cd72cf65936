use crate::model::{EXCLUDED_LOCATIONS, Field, Observation, Record, StorageError};
use rusqlite::{Connection, params_from_iter};

pub const COLLECTION: &str = "covid_data";

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens the database and makes sure the collection exists.
    pub fn new(db_path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(db_path)?;
        conn.execute_batch(&Self::create_sql())?;
        Ok(Self { conn })
    }

    fn create_sql() -> String {
        let columns = Field::ALL
            .iter()
            .map(|f| format!("{} TEXT", f.column()))
            .collect::<Vec<_>>()
            .join(", ");
        format!("CREATE TABLE IF NOT EXISTS {} ({});", COLLECTION, columns)
    }

    /// Drops the collection and recreates it empty.
    pub fn reset_collection(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(&format!(
            "DROP TABLE IF EXISTS {}; {}",
            COLLECTION,
            Self::create_sql()
        ))?;
        Ok(())
    }

    /// Inserts one batch inside its own transaction.
    pub fn insert_batch(&mut self, records: &[Record]) -> Result<usize, StorageError> {
        let columns = Field::ALL.iter().map(|f| f.column()).collect::<Vec<_>>();
        let placeholders = (1..=columns.len()).map(|i| format!("?{}", i)).collect::<Vec<_>>();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            COLLECTION,
            columns.join(", "),
            placeholders.join(", ")
        );

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(&sql)?;
            for record in records {
                stmt.execute(params_from_iter(Field::ALL.iter().map(|f| record.value(*f))))?;
            }
        }
        tx.commit()?;
        Ok(records.len())
    }

    pub fn count_records(&self) -> Result<u64, StorageError> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", COLLECTION),
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Distinct non-null values of one column, ascending.
    pub fn distinct_values(&self, field: Field) -> Result<Vec<String>, StorageError> {
        let sql = format!(
            "SELECT DISTINCT {col} FROM {table} WHERE {col} IS NOT NULL ORDER BY {col} ASC",
            col = field.column(),
            table = COLLECTION
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut values = Vec::new();
        for value in rows {
            values.push(value?);
        }
        Ok(values)
    }

    /// Whether any row leaves `field` NULL.
    pub fn has_null(&self, field: Field) -> Result<bool, StorageError> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {table} WHERE {col} IS NULL)",
            col = field.column(),
            table = COLLECTION
        );
        let exists: bool = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(exists)
    }

    /// Rows of non-excluded locations where every requested field is non-blank,
    /// ordered by location ascending, date descending, then insertion order.
    pub fn observations(&self, fields: &[Field]) -> Result<Vec<Observation>, StorageError> {
        let mut sql = String::from("SELECT location, date");
        for field in fields {
            sql.push_str(", ");
            sql.push_str(field.column());
        }
        sql.push_str(&format!(" FROM {} WHERE location IS NOT NULL", COLLECTION));
        for field in fields {
            sql.push_str(&format!(
                " AND {col} IS NOT NULL AND {col} <> ''",
                col = field.column()
            ));
        }
        let placeholders = EXCLUDED_LOCATIONS.iter().map(|_| "?").collect::<Vec<_>>().join(",");
        sql.push_str(&format!(
            " AND location NOT IN ({}) ORDER BY location ASC, date DESC, rowid ASC",
            placeholders
        ));

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(EXCLUDED_LOCATIONS.iter()), |row| {
            let mut values = Vec::with_capacity(fields.len());
            for (i, field) in fields.iter().enumerate() {
                values.push((*field, row.get::<_, String>(i + 2)?));
            }
            Ok(Observation {
                location: row.get(0)?,
                date: row.get(1)?,
                values,
            })
        })?;

        let mut observations = Vec::new();
        for observation in rows {
            observations.push(observation?);
        }
        Ok(observations)
    }
}
