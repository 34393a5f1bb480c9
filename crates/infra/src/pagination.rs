#[derive(Debug, Clone, Copy)]
pub struct LimitOffset {
    pub limit: i64,
    pub offset: i64,
}

impl LimitOffset {
    /// Build a page from optional client values, clamping the limit to 1..=100.
    pub fn from_parts(limit: Option<i32>, offset: Option<i32>) -> Self {
        let default = Self::default();
        Self {
            limit: limit.map(|l| i64::from(l).clamp(1, 100)).unwrap_or(default.limit),
            offset: offset.map(|o| i64::from(o).max(0)).unwrap_or(default.offset),
        }
    }
}

impl Default for LimitOffset {
    fn default() -> Self {
        Self {
            limit: 50,
            offset: 0,
        }
    }
}
