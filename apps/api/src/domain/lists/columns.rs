// Header alias tables
// Maps the canonical contact fields onto the header spellings accepted per file kind

/// Canonical contact field a source column can feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Name,
    Phone,
    Notes,
}

/// Ordered alias table: canonical field -> accepted header spellings
///
/// Aliases are compared case-insensitively after trimming. When several
/// aliases of one field are present in a file, the first alias (in table
/// order) holding a non-empty value for a row wins.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    entries: Vec<(ContactField, Vec<String>)>,
}

/// Aliases accepted in CSV headers
const CSV_ALIASES: &[(ContactField, &[&str])] = &[
    (ContactField::Name, &["firstname"]),
    (ContactField::Phone, &["phone"]),
    (ContactField::Notes, &["notes"]),
];

/// Aliases accepted in spreadsheet headers
const SPREADSHEET_ALIASES: &[(ContactField, &[&str])] = &[
    (ContactField::Name, &["FirstName", "firstname", "First Name"]),
    (ContactField::Phone, &["Phone", "phone", "mobile", "Mobile"]),
    (ContactField::Notes, &["Notes", "notes", "Note", "note"]),
];

impl ColumnMap {
    /// Builds a map from `(field, aliases)` pairs
    ///
    /// Aliases are stored normalized; duplicates that collapse under case
    /// folding are kept once, at their first position.
    pub fn new<'a, I, A>(entries: I) -> Self
    where
        I: IntoIterator<Item = (ContactField, A)>,
        A: IntoIterator<Item = &'a str>,
    {
        let entries = entries
            .into_iter()
            .map(|(field, aliases)| {
                let mut normalized: Vec<String> = Vec::new();
                for alias in aliases {
                    let alias = normalize_header(alias);
                    if !normalized.contains(&alias) {
                        normalized.push(alias);
                    }
                }
                (field, normalized)
            })
            .collect();

        Self { entries }
    }

    /// Header table for delimited text files
    pub fn csv() -> Self {
        Self::new(CSV_ALIASES.iter().map(|(f, a)| (*f, a.iter().copied())))
    }

    /// Header table for xls/xlsx workbooks
    pub fn spreadsheet() -> Self {
        Self::new(SPREADSHEET_ALIASES.iter().map(|(f, a)| (*f, a.iter().copied())))
    }

    /// Returns the normalized aliases for a field
    pub fn aliases(&self, field: ContactField) -> &[String] {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, aliases)| aliases.as_slice())
            .unwrap_or(&[])
    }

    /// Resolves a header row into per-field column positions
    pub fn resolve<S: AsRef<str>>(&self, headers: &[S]) -> ResolvedColumns {
        let headers: Vec<String> = headers.iter().map(|h| normalize_header(h.as_ref())).collect();

        let positions_for = |field: ContactField| -> Vec<usize> {
            self.aliases(field)
                .iter()
                .flat_map(|alias| {
                    headers
                        .iter()
                        .enumerate()
                        .filter(move |(_, header)| *header == alias)
                        .map(|(idx, _)| idx)
                })
                .collect()
        };

        ResolvedColumns {
            name: positions_for(ContactField::Name),
            phone: positions_for(ContactField::Phone),
            notes: positions_for(ContactField::Notes),
        }
    }
}

/// Column positions for each canonical field, in alias priority order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub name: Vec<usize>,
    pub phone: Vec<usize>,
    pub notes: Vec<usize>,
}

impl ResolvedColumns {
    /// Picks the first non-blank value among `positions` using `cell`
    pub fn pick<'a, F>(positions: &[usize], cell: F) -> &'a str
    where
        F: Fn(usize) -> Option<&'a str>,
    {
        positions
            .iter()
            .filter_map(|&idx| cell(idx))
            .map(str::trim)
            .find(|value| !value.is_empty())
            .unwrap_or("")
    }
}

fn normalize_header(header: &str) -> String {
    header.trim_start_matches('\u{feff}').trim().to_lowercase()
}
