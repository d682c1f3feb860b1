//! Column-name heuristics: maps arbitrary header names onto logical fields.

use std::fmt;

/// Logical record fields a source column can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    MediaUrl,
    Title,
    Category,
    Instructor,
    Organization,
    Participant,
}

impl Field {
    /// Order in which fields claim columns. Earlier fields win contested columns,
    /// e.g. `参赛者组别` goes to category before participant can match `参赛者`.
    pub const ASSIGNMENT_ORDER: [Field; 6] = [
        Field::MediaUrl,
        Field::Title,
        Field::Category,
        Field::Instructor,
        Field::Organization,
        Field::Participant,
    ];

    /// Lowercase keywords in priority order.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Field::MediaUrl => &["链接", "url", "link", "地址", "address", "http"],
            Field::Title => &["作品名称", "作品名", "标题", "title", "作品", "名称", "work"],
            Field::Category => &["组别", "类别", "分组", "category", "group", "division"],
            Field::Instructor => &[
                "指导老师", "指导教师", "老师", "教师", "instructor", "teacher", "advisor", "mentor",
            ],
            Field::Organization => &[
                "推送单位", "单位", "学校", "机构", "organization", "school", "org",
            ],
            Field::Participant => &[
                "身份证名字", "参赛者", "选手", "姓名", "作者", "participant", "author", "name",
            ],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Field::MediaUrl => "media url",
            Field::Title => "title",
            Field::Category => "category",
            Field::Instructor => "instructor",
            Field::Organization => "organization",
            Field::Participant => "participant",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of matching a header row against the field keyword sets.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    headers: Vec<String>,
    /// `(field, column index)` for every single-column field that matched.
    assigned: Vec<(Field, usize)>,
    /// Every column that looks like a link column, in priority order.
    url_columns: Vec<usize>,
}

impl ColumnMap {
    /// Matches `headers` case-insensitively by substring.
    ///
    /// For each field in `Field::ASSIGNMENT_ORDER`, keywords are tried in order and,
    /// per keyword, columns in source order; claimed columns are skipped. All link-like
    /// columns are claimed by the media-URL field so a row can fall back between them.
    pub fn detect(headers: &[String]) -> Self {
        let lowered: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
        let mut claimed = vec![false; headers.len()];
        let mut map = ColumnMap {
            headers: headers.to_vec(),
            ..Default::default()
        };

        for field in Field::ASSIGNMENT_ORDER {
            for keyword in field.keywords() {
                for (idx, name) in lowered.iter().enumerate() {
                    if claimed[idx] || !name.contains(keyword) {
                        continue;
                    }
                    if field == Field::MediaUrl {
                        claimed[idx] = true;
                        map.url_columns.push(idx);
                    } else {
                        claimed[idx] = true;
                        map.assigned.push((field, idx));
                        break;
                    }
                }
                if field != Field::MediaUrl && map.column_for(field).is_some() {
                    break;
                }
            }
        }

        tracing::debug!(
            assigned = ?map.assigned,
            url_columns = ?map.url_columns,
            "column mapping detected"
        );
        map
    }

    /// Source column index for a single-column field (`MediaUrl` → first link column).
    pub fn column_for(&self, field: Field) -> Option<usize> {
        if field == Field::MediaUrl {
            return self.url_columns.first().copied();
        }
        self.assigned
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, idx)| *idx)
    }

    /// Header text of the column mapped to `field`.
    pub fn column_name(&self, field: Field) -> Option<&str> {
        self.column_for(field)
            .and_then(|idx| self.headers.get(idx))
            .map(String::as_str)
    }

    /// Link-like columns in the order they are tried per row.
    pub fn url_columns(&self) -> &[usize] {
        &self.url_columns
    }

    /// Header names that mapped to some logical field.
    pub fn recognized_columns(&self) -> Vec<&str> {
        let mut idxs: Vec<usize> = self
            .assigned
            .iter()
            .map(|(_, idx)| *idx)
            .chain(self.url_columns.iter().copied())
            .collect();
        idxs.sort_unstable();
        idxs.into_iter()
            .filter_map(|idx| self.headers.get(idx).map(String::as_str))
            .collect()
    }

    /// Required fields that found no column.
    pub fn missing_required(&self) -> Vec<Field> {
        [Field::Title]
            .into_iter()
            .filter(|f| self.column_for(*f).is_none())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn mapped(map: &ColumnMap, field: Field) -> Option<String> {
        map.column_name(field).map(str::to_string)
    }

    #[test]
    fn original_contest_headers() {
        let h = headers(&[
            "作品名称",
            "身份证名字",
            "参赛者组别",
            "指导老师",
            "联系电话",
            "推送单位学校",
            "资料链接",
        ]);
        let map = ColumnMap::detect(&h);
        assert_eq!(mapped(&map, Field::Title).as_deref(), Some("作品名称"));
        assert_eq!(mapped(&map, Field::Participant).as_deref(), Some("身份证名字"));
        assert_eq!(mapped(&map, Field::Category).as_deref(), Some("参赛者组别"));
        assert_eq!(mapped(&map, Field::Instructor).as_deref(), Some("指导老师"));
        assert_eq!(mapped(&map, Field::Organization).as_deref(), Some("推送单位学校"));
        assert_eq!(mapped(&map, Field::MediaUrl).as_deref(), Some("资料链接"));
        assert!(map.missing_required().is_empty());
        assert!(!map.recognized_columns().contains(&"联系电话"));
    }

    #[test]
    fn mapping_is_stable_under_reordering() {
        let a = ColumnMap::detect(&headers(&["视频链接", "作品名称"]));
        let b = ColumnMap::detect(&headers(&["作品名称", "视频链接"]));
        for field in Field::ASSIGNMENT_ORDER {
            assert_eq!(mapped(&a, field), mapped(&b, field), "field {field}");
        }
        assert_eq!(mapped(&a, Field::MediaUrl).as_deref(), Some("视频链接"));
        assert_eq!(mapped(&a, Field::Title).as_deref(), Some("作品名称"));
    }

    #[test]
    fn category_is_not_taken_as_participant() {
        let map = ColumnMap::detect(&headers(&["参赛者组别", "参赛者", "作品名称"]));
        assert_eq!(mapped(&map, Field::Category).as_deref(), Some("参赛者组别"));
        assert_eq!(mapped(&map, Field::Participant).as_deref(), Some("参赛者"));
    }

    #[test]
    fn link_column_does_not_become_title() {
        let map = ColumnMap::detect(&headers(&["作品链接", "标题"]));
        assert_eq!(mapped(&map, Field::MediaUrl).as_deref(), Some("作品链接"));
        assert_eq!(mapped(&map, Field::Title).as_deref(), Some("标题"));
    }

    #[test]
    fn explicit_title_column_beats_other_work_columns() {
        let map = ColumnMap::detect(&headers(&["作品类别", "作品作者", "标题", "视频链接"]));
        assert_eq!(mapped(&map, Field::Title).as_deref(), Some("标题"));
        assert_eq!(mapped(&map, Field::Category).as_deref(), Some("作品类别"));
        assert_eq!(mapped(&map, Field::Participant).as_deref(), Some("作品作者"));
    }

    #[test]
    fn english_headers_case_insensitive() {
        let map = ColumnMap::detect(&headers(&[
            "Video URL",
            "Work Title",
            "Participant Name",
            "Group",
            "Teacher",
            "School",
        ]));
        assert_eq!(mapped(&map, Field::MediaUrl).as_deref(), Some("Video URL"));
        assert_eq!(mapped(&map, Field::Title).as_deref(), Some("Work Title"));
        assert_eq!(mapped(&map, Field::Participant).as_deref(), Some("Participant Name"));
        assert_eq!(mapped(&map, Field::Category).as_deref(), Some("Group"));
        assert_eq!(mapped(&map, Field::Instructor).as_deref(), Some("Teacher"));
        assert_eq!(mapped(&map, Field::Organization).as_deref(), Some("School"));
    }

    #[test]
    fn multiple_link_columns_are_all_candidates() {
        let map = ColumnMap::detect(&headers(&["作品名称", "备用地址", "视频链接"]));
        // "链接" outranks "地址", so the 链接 column is tried first.
        assert_eq!(map.url_columns(), &[2, 1]);
    }

    #[test]
    fn missing_title_is_reported() {
        let map = ColumnMap::detect(&headers(&["视频链接", "指导老师"]));
        assert_eq!(map.missing_required(), vec![Field::Title]);
    }
}
