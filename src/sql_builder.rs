//! Parameterized SELECT construction for the history store.
//!
//! Values are always bound through `?` placeholders, never interpolated.
//! Builder methods return `&mut Self` for chaining.
//!
//! # Example
//!
//! ```rust
//! use ngi_sdk::SqlBuilder;
//! let (sql, params) = SqlBuilder::new("price_data")
//!     .where_eq("point_code", "SLAHH")
//!     .where_gte("trade_date", "2024-01-01")
//!     .order_by(&["trade_date ASC"])
//!     .limit(10)
//!     .build();
//! assert_eq!(params, vec!["SLAHH", "2024-01-01"]);
//! ```

/// Builds a parameterized `SELECT` statement.
pub struct SqlBuilder {
    select_cols: Vec<String>,
    is_distinct: bool,
    from_table: String,
    where_clauses: Vec<String>,
    params: Vec<String>,
    order_by_cols: Vec<String>,
    limit_val: Option<usize>,
}

impl SqlBuilder {
    /// Create a builder selecting `*` from the given table.
    pub fn new(table: &str) -> Self {
        Self {
            select_cols: vec!["*".to_string()],
            is_distinct: false,
            from_table: table.to_string(),
            where_clauses: Vec::new(),
            params: Vec::new(),
            order_by_cols: Vec::new(),
            limit_val: None,
        }
    }

    /// Replace the default `*` column list.
    pub fn select(&mut self, cols: &[&str]) -> &mut Self {
        self.select_cols = cols.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn distinct(&mut self) -> &mut Self {
        self.is_distinct = true;
        self
    }

    /// Add a raw condition using `?` for each of `params`, in order.
    pub fn where_clause(&mut self, condition: &str, params: &[&str]) -> &mut Self {
        self.where_clauses.push(condition.to_string());
        self.params.extend(params.iter().map(|p| p.to_string()));
        self
    }

    /// `{column} = ?`
    pub fn where_eq(&mut self, column: &str, value: &str) -> &mut Self {
        self.where_clause(&format!("{} = ?", column), &[value])
    }

    /// `{column} >= ?`
    pub fn where_gte(&mut self, column: &str, value: &str) -> &mut Self {
        self.where_clause(&format!("{} >= ?", column), &[value])
    }

    /// `{column} <= ?`
    pub fn where_lte(&mut self, column: &str, value: &str) -> &mut Self {
        self.where_clause(&format!("{} <= ?", column), &[value])
    }

    /// Add ORDER BY clauses (e.g. `"trade_date ASC"`).
    pub fn order_by(&mut self, clauses: &[&str]) -> &mut Self {
        self.order_by_cols.extend(clauses.iter().map(|c| c.to_string()));
        self
    }

    pub fn limit(&mut self, n: usize) -> &mut Self {
        self.limit_val = Some(n);
        self
    }

    /// Return `(sql, params)` ready for [`Connection::execute`](crate::Connection::execute).
    pub fn build(&self) -> (String, Vec<String>) {
        let distinct = if self.is_distinct { "DISTINCT " } else { "" };
        let mut parts = vec![
            format!("SELECT {}{}", distinct, self.select_cols.join(", ")),
            format!("FROM {}", self.from_table),
        ];

        if !self.where_clauses.is_empty() {
            parts.push(format!("WHERE {}", self.where_clauses.join(" AND ")));
        }

        if !self.order_by_cols.is_empty() {
            parts.push(format!("ORDER BY {}", self.order_by_cols.join(", ")));
        }

        if let Some(n) = self.limit_val {
            parts.push(format!("LIMIT {}", n));
        }

        (parts.join("\n"), self.params.clone())
    }
}
