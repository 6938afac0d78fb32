//! 可排序表格
//!
//! 列点击规则：再次点击当前列翻转方向，点击其他列时按升序排列该列。
//! 文本比较忽略大小写，缺失值无论方向都排在最后。

use dosportal_shared::{
    Detector, LogbookItem, Measurement, OrganizationMember, Ref, SpectralRecord, UserOrganization,
};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// 表头上的指示箭头
    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}

/// 表格列定义
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub key: &'static str,
    pub label: &'static str,
    pub sortable: bool,
}

impl Column {
    pub const fn sortable(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            sortable: true,
        }
    }

    pub const fn fixed(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            sortable: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub field: &'static str,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            direction: SortDirection::default(),
        }
    }

    pub fn with_direction(field: &'static str, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// 处理表头点击
    pub fn click(&mut self, field: &'static str) {
        if self.field == field {
            self.direction = self.direction.flip();
        } else {
            self.field = field;
            self.direction = SortDirection::Asc;
        }
    }

    pub fn indicator(&self, field: &str) -> &'static str {
        if self.field == field {
            self.direction.arrow()
        } else {
            ""
        }
    }
}

// =========================================================
// 排序键
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Missing,
    Number(f64),
    /// 已转为小写
    Text(String),
}

impl SortKey {
    pub fn text(value: &str) -> Self {
        SortKey::Text(value.to_lowercase())
    }

    pub fn opt_text(value: Option<&str>) -> Self {
        value.map(Self::text).unwrap_or(SortKey::Missing)
    }

    pub fn opt_number(value: Option<f64>) -> Self {
        value.map(SortKey::Number).unwrap_or(SortKey::Missing)
    }

    pub fn time(value: Option<&DateTime<Utc>>) -> Self {
        value
            .map(|dt| SortKey::Number(dt.timestamp_millis() as f64))
            .unwrap_or(SortKey::Missing)
    }

    fn rank(&self) -> u8 {
        match self {
            SortKey::Number(_) => 0,
            SortKey::Text(_) => 1,
            SortKey::Missing => 2,
        }
    }
}

/// 比较两个排序键，缺失值总在最后
pub fn compare_keys(a: &SortKey, b: &SortKey, direction: SortDirection) -> Ordering {
    match (a, b) {
        (SortKey::Missing, SortKey::Missing) => Ordering::Equal,
        (SortKey::Missing, _) => Ordering::Greater,
        (_, SortKey::Missing) => Ordering::Less,
        _ => {
            let ord = match (a, b) {
                (SortKey::Number(x), SortKey::Number(y)) => {
                    x.partial_cmp(y).unwrap_or(Ordering::Equal)
                }
                (SortKey::Text(x), SortKey::Text(y)) => x.cmp(y),
                _ => a.rank().cmp(&b.rank()),
            };
            match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        }
    }
}

pub trait Sortable {
    fn sort_key(&self, field: &str) -> SortKey;
}

/// 稳定排序
pub fn sort_rows<T: Sortable>(rows: &mut [T], state: &SortState) {
    rows.sort_by(|a, b| {
        compare_keys(
            &a.sort_key(state.field),
            &b.sort_key(state.field),
            state.direction,
        )
    });
}

/// 返回排好序的副本，供渲染使用
pub fn sorted<T: Sortable + Clone>(rows: &[T], state: &SortState) -> Vec<T> {
    let mut rows = rows.to_vec();
    sort_rows(&mut rows, state);
    rows
}

// =========================================================
// 各资源的排序键
// =========================================================

fn ref_name<T>(value: Option<&Ref<T>>, name: impl Fn(&T) -> &str) -> SortKey {
    match value {
        Some(Ref::Expanded(inner)) => SortKey::text(name(inner)),
        Some(Ref::Id(id)) => SortKey::Text(id.to_string()),
        None => SortKey::Missing,
    }
}

impl Sortable for LogbookItem {
    fn sort_key(&self, field: &str) -> SortKey {
        match field {
            "created" => SortKey::time(self.created.as_ref()),
            "entry_type" => SortKey::text(self.entry_type.label()),
            "text" => SortKey::text(&self.text),
            "author" => SortKey::opt_text(self.author.as_ref().map(|a| a.username.as_str())),
            "public" => SortKey::Number(if self.public { 1.0 } else { 0.0 }),
            _ => SortKey::Missing,
        }
    }
}

impl Sortable for SpectralRecord {
    fn sort_key(&self, field: &str) -> SortKey {
        match field {
            "name" => SortKey::text(&self.name),
            "created" => SortKey::time(self.created.as_ref()),
            "processing_status" => SortKey::text(self.processing_status.as_str()),
            "author" => SortKey::opt_text(self.author.as_ref().map(|a| a.username.as_str())),
            "artifacts_count" => SortKey::Number(self.artifacts_count as f64),
            _ => SortKey::Missing,
        }
    }
}

impl Sortable for Measurement {
    fn sort_key(&self, field: &str) -> SortKey {
        match field {
            "name" => SortKey::text(&self.name),
            "measurement_type" => SortKey::text(self.measurement_type.label()),
            "time_start" => SortKey::time(self.time_start.as_ref()),
            "time_end" => SortKey::time(self.time_end.as_ref()),
            "time_created" => SortKey::time(self.time_created.as_ref()),
            "owner" => ref_name(self.owner.as_ref(), |o| o.name.as_str()),
            _ => SortKey::Missing,
        }
    }
}

impl Sortable for Detector {
    fn sort_key(&self, field: &str) -> SortKey {
        match field {
            "name" => SortKey::text(&self.name),
            "sn" => SortKey::text(&self.sn),
            "type" => SortKey::text(&self.detector_type.name),
            "owner" => ref_name(self.owner.as_ref(), |o| o.name.as_str()),
            _ => SortKey::Missing,
        }
    }
}

impl Sortable for OrganizationMember {
    fn sort_key(&self, field: &str) -> SortKey {
        match field {
            "username" => SortKey::text(&self.username),
            "name" => SortKey::text(&format!("{} {}", self.first_name, self.last_name)),
            "user_type" => SortKey::text(self.user_type.label()),
            _ => SortKey::Missing,
        }
    }
}

impl Sortable for UserOrganization {
    fn sort_key(&self, field: &str) -> SortKey {
        match field {
            "name" => SortKey::text(&self.name),
            "user_type" => SortKey::text(self.user_type.label()),
            "data_policy" => SortKey::opt_text(self.data_policy.as_deref()),
            _ => SortKey::Missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        name: Option<&'static str>,
        size: Option<f64>,
    }

    impl Sortable for Row {
        fn sort_key(&self, field: &str) -> SortKey {
            match field {
                "name" => SortKey::opt_text(self.name),
                "size" => SortKey::opt_number(self.size),
                _ => SortKey::Missing,
            }
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { name: Some("beta"), size: Some(2.0) },
            Row { name: None, size: Some(10.0) },
            Row { name: Some("Alpha"), size: None },
            Row { name: Some("gamma"), size: Some(1.0) },
        ]
    }

    fn names(rows: &[Row]) -> Vec<Option<&'static str>> {
        rows.iter().map(|r| r.name).collect()
    }

    #[test]
    fn test_click_toggles_and_resets() {
        let mut state = SortState::new("created");
        assert_eq!(state.direction, SortDirection::Desc);

        state.click("created");
        assert_eq!(state.direction, SortDirection::Asc);
        state.click("created");
        assert_eq!(state.direction, SortDirection::Desc);

        state.click("name");
        assert_eq!(state.field, "name");
        assert_eq!(state.direction, SortDirection::Asc);
        assert_eq!(state.indicator("name"), "▲");
        assert_eq!(state.indicator("created"), "");
    }

    #[test]
    fn test_text_is_case_insensitive_and_missing_last() {
        let asc = sorted(&rows(), &SortState::with_direction("name", SortDirection::Asc));
        assert_eq!(names(&asc), vec![Some("Alpha"), Some("beta"), Some("gamma"), None]);

        let desc = sorted(&rows(), &SortState::with_direction("name", SortDirection::Desc));
        assert_eq!(names(&desc), vec![Some("gamma"), Some("beta"), Some("Alpha"), None]);
    }

    #[test]
    fn test_numbers_sort_numerically() {
        let asc = sorted(&rows(), &SortState::with_direction("size", SortDirection::Asc));
        let sizes: Vec<_> = asc.iter().map(|r| r.size).collect();
        assert_eq!(sizes, vec![Some(1.0), Some(2.0), Some(10.0), None]);
    }

    #[test]
    fn test_nested_owner_sorts_by_name() {
        use dosportal_shared::OrganizationSummary;
        use uuid::Uuid;

        let org = |name: &str| {
            Some(Ref::Expanded(OrganizationSummary {
                id: Uuid::nil(),
                name: name.to_string(),
                slug: None,
            }))
        };
        assert_eq!(
            ref_name(org("UST").as_ref(), |o| o.name.as_str()),
            SortKey::Text("ust".into())
        );
        assert_eq!(ref_name::<OrganizationSummary>(None, |o| o.name.as_str()), SortKey::Missing);
    }
}
