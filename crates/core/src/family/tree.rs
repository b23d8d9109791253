use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::member::{parse_parent, Member};
use crate::error::{Result, TreeError};

/// Indexed working set of family members.
///
/// Members are kept in input order and mapped to contiguous 0-based indices.
/// Father and mother links are resolved to indices once at construction;
/// a link naming an identifier outside the set is kept on the [`Member`] but
/// resolves to `None`.
#[derive(Debug, Clone)]
pub struct FamilyTree {
    /// Members in input order, with placeholder parent ids normalized away.
    members: Vec<Member>,
    /// Resolved father index per member.
    father: Vec<Option<usize>>,
    /// Resolved mother index per member.
    mother: Vec<Option<usize>>,
    /// Members listing each member as father or mother.
    children: Vec<Vec<usize>>,
    /// Mapping from member ID string to its 0-based index.
    id_to_index: HashMap<String, usize>,
}

/// JSON payloads accepted from the data layer: a bare array of member
/// documents or the API's `{ "data": [...] }` envelope.
#[derive(Deserialize)]
#[serde(untagged)]
enum MemberPayload {
    List(Vec<Member>),
    Envelope { data: Vec<Member> },
}

impl FamilyTree {
    /// Build a tree from a collection of members.
    ///
    /// Parent links may reference members appearing later in the input.
    ///
    /// # Errors
    /// Returns an error if two members share an identifier.
    pub fn from_members(members: Vec<Member>) -> Result<Self> {
        let n = members.len();
        let mut id_to_index = HashMap::with_capacity(n);
        let mut normalized = Vec::with_capacity(n);

        // First pass: register all members so parent lookups can succeed
        // regardless of input order.
        for mut member in members {
            if id_to_index.contains_key(&member.id) {
                return Err(TreeError::Member(format!(
                    "Duplicate member ID: '{}'",
                    member.id
                )));
            }
            member.normalize_parents();
            id_to_index.insert(member.id.clone(), normalized.len());
            normalized.push(member);
        }

        // Second pass: resolve parent indices and the child adjacency.
        let resolve = |parent: &Option<String>| {
            parent
                .as_deref()
                .and_then(|p| id_to_index.get(p).copied())
        };
        let father: Vec<Option<usize>> = normalized.iter().map(|m| resolve(&m.father_id)).collect();
        let mother: Vec<Option<usize>> = normalized.iter().map(|m| resolve(&m.mother_id)).collect();

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
        for i in 0..n {
            if let Some(f) = father[i] {
                children[f].push(i);
            }
            if let Some(m) = mother[i] {
                if father[i] != Some(m) {
                    children[m].push(i);
                }
            }
        }

        let tree = Self {
            members: normalized,
            father,
            mother,
            children,
            id_to_index,
        };
        log::debug!(
            "Family tree built: {} members, {} roots",
            tree.len(),
            tree.roots().len()
        );
        Ok(tree)
    }

    /// Read a family tree from a CSV file.
    ///
    /// Required columns (header required, case-insensitive): `id`, `father`,
    /// `mother` (`_id`, `fatherId`, `motherId` are accepted too). Optional
    /// columns: `name`, `surname`, `gender`, `status`, `birth_date`,
    /// `blood_type`, and `conditions` holding `;`-separated condition keys.
    /// Unknown parents are coded as `"0"`, `""`, or `"NA"`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, required columns are
    /// missing, or duplicate member IDs are found.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .trim(csv::Trim::All)
            .from_path(path.as_ref())?;
        Self::from_csv_reader(reader)
    }

    /// Read a family tree from CSV text. See [`FamilyTree::from_csv`].
    pub fn from_csv_str(content: &str) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        Self::from_csv_reader(reader)
    }

    fn from_csv_reader<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.to_lowercase())
            .collect();

        let id_col = required_column(&headers, &["id", "_id"])?;
        let father_col = required_column(&headers, &["father", "fatherid", "father_id"])?;
        let mother_col = required_column(&headers, &["mother", "motherid", "mother_id"])?;

        let name_col = column(&headers, &["name"]);
        let surname_col = column(&headers, &["surname"]);
        let gender_col = column(&headers, &["gender"]);
        let status_col = column(&headers, &["status"]);
        let birth_col = column(&headers, &["birth_date", "birthdate"]);
        let blood_col = column(&headers, &["blood_type", "bloodtype"]);
        let conditions_col = column(&headers, &["conditions", "medical_conditions"]);

        let mut members = Vec::new();

        for result in reader.records() {
            let record = result?;
            let field = |col: usize| record.get(col).unwrap_or("");
            let optional = |col: Option<usize>| {
                col.map(field)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
            };

            let id = field(id_col);
            if id.is_empty() {
                return Err(TreeError::Data("Missing id field in row".to_string()));
            }

            members.push(Member {
                id: id.to_string(),
                name: optional(name_col).unwrap_or_default(),
                surname: optional(surname_col),
                father_id: parse_parent(field(father_col)),
                mother_id: parse_parent(field(mother_col)),
                gender: optional(gender_col),
                status: optional(status_col),
                birth_date: optional(birth_col),
                blood_type: optional(blood_col),
                medical_conditions: optional(conditions_col)
                    .map(|c| {
                        c.split(';')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(str::to_string)
                            .collect::<Vec<String>>()
                    })
                    .unwrap_or_default(),
            });
        }

        Self::from_members(members)
    }

    /// Parse a family tree from JSON text: an array of member documents or
    /// an object with a `data` array.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let members = match serde_json::from_str::<MemberPayload>(content)? {
            MemberPayload::List(members) => members,
            MemberPayload::Envelope { data } => data,
        };
        Self::from_members(members)
    }

    /// Read a family tree from a JSON file. See [`FamilyTree::from_json_str`].
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Number of members in the tree.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Member at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn member(&self, index: usize) -> &Member {
        &self.members[index]
    }

    /// All members in input order.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Look up the 0-based index of a member by its ID string.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.id_to_index.get(id).copied()
    }

    /// Resolved father index for member at `index`, or `None` if unknown.
    pub fn father(&self, index: usize) -> Option<usize> {
        self.father[index]
    }

    /// Resolved mother index for member at `index`, or `None` if unknown.
    pub fn mother(&self, index: usize) -> Option<usize> {
        self.mother[index]
    }

    /// Indices of members whose father or mother is the member at `index`.
    pub fn children(&self, index: usize) -> &[usize] {
        &self.children[index]
    }

    /// Indices of members with neither a resolvable father nor mother.
    pub fn roots(&self) -> Vec<usize> {
        (0..self.len())
            .filter(|&i| self.father[i].is_none() && self.mother[i].is_none())
            .collect()
    }

    /// Parent links naming identifiers absent from the tree, as
    /// `(member id, missing parent id)` pairs.
    pub fn dangling_parents(&self) -> Vec<(&str, &str)> {
        let mut dangling = Vec::new();
        for (i, m) in self.members.iter().enumerate() {
            if let (Some(id), None) = (m.father_id.as_deref(), self.father[i]) {
                dangling.push((m.id.as_str(), id));
            }
            if let (Some(id), None) = (m.mother_id.as_deref(), self.mother[i]) {
                dangling.push((m.id.as_str(), id));
            }
        }
        dangling
    }

    /// Validate the ancestry links.
    ///
    /// Checks:
    /// - No member is listed as its own father or mother.
    /// - No member is its own ancestor (cycle detection).
    ///
    /// Dangling parent identifiers are not errors; see
    /// [`FamilyTree::dangling_parents`].
    ///
    /// # Errors
    /// Returns [`TreeError::MalformedAncestry`] describing the first problem
    /// found.
    pub fn validate(&self) -> Result<()> {
        for (i, m) in self.members.iter().enumerate() {
            if self.father[i] == Some(i) {
                return Err(malformed(&m.id, "listed as its own father"));
            }
            if self.mother[i] == Some(i) {
                return Err(malformed(&m.id, "listed as its own mother"));
            }
        }

        // Three-state DFS over parent links: a grey node reached again is
        // on the current path, so the walk has found a cycle.
        let mut state = vec![Visit::White; self.len()];
        for start in 0..self.len() {
            if state[start] == Visit::White {
                if let Some(on_cycle) = self.find_cycle(start, &mut state) {
                    return Err(malformed(
                        &self.members[on_cycle].id,
                        "member is its own ancestor",
                    ));
                }
            }
        }

        Ok(())
    }

    fn find_cycle(&self, index: usize, state: &mut [Visit]) -> Option<usize> {
        state[index] = Visit::Grey;
        for parent in [self.father[index], self.mother[index]].into_iter().flatten() {
            match state[parent] {
                Visit::Grey => return Some(parent),
                Visit::White => {
                    if let Some(found) = self.find_cycle(parent, state) {
                        return Some(found);
                    }
                }
                Visit::Black => {}
            }
        }
        state[index] = Visit::Black;
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    White,
    Grey,
    Black,
}

fn malformed(member: &str, reason: &str) -> TreeError {
    TreeError::MalformedAncestry {
        member: member.to_string(),
        reason: reason.to_string(),
    }
}

/// Position of the first header matching any of `names`.
fn column(headers: &[String], names: &[&str]) -> Option<usize> {
    headers.iter().position(|h| names.contains(&h.as_str()))
}

fn required_column(headers: &[String], names: &[&str]) -> Result<usize> {
    column(headers, names)
        .ok_or_else(|| TreeError::Data(format!("CSV missing '{}' column", names[0])))
}
