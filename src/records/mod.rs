//! Typed entity records and the tables that accumulate them
//!
//! Each entity is a flat struct whose fields map one-to-one, in order, onto
//! the columns of its output sheet. Facts that extraction may fail to find are
//! `Option<String>` and render as [`NOT_AVAILABLE`]; identity fields and
//! user-fill fields are plain strings.

mod ids;

pub use ids::{generate_id, IdKind};

/// Sentinel written for any fact that could not be determined
pub const NOT_AVAILABLE: &str = "N/A";

/// Notes tag carried by every synthesized placeholder record
pub const APPROXIMATE_NOTE: &str = "Approximate data, verify on the official website";

/// A row in one of the output sheets
pub trait Record {
    /// Sheet (table) name
    const SHEET: &'static str;

    /// Column names, in sheet order
    const COLUMNS: &'static [&'static str];

    /// Cell values, in the same order as [`Record::COLUMNS`]
    fn cells(&self) -> Vec<String>;
}

/// Conversion of a record field into its cell text
pub trait CellValue {
    fn cell(&self) -> String;
}

impl CellValue for String {
    fn cell(&self) -> String {
        self.clone()
    }
}

impl CellValue for Option<String> {
    fn cell(&self) -> String {
        self.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }
}

macro_rules! record {
    (
        $(#[$meta:meta])*
        $name:ident => $sheet:literal {
            $($field:ident : $ty:ty => $column:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name {
            $(pub $field: $ty),+
        }

        impl $crate::records::Record for $name {
            const SHEET: &'static str = $sheet;
            const COLUMNS: &'static [&'static str] = &[$($column),+];

            fn cells(&self) -> Vec<String> {
                use $crate::records::CellValue;
                vec![$(self.$field.cell()),+]
            }
        }
    };
}

mod entities;

pub use entities::{
    Admission, CostOfLiving, Lab, Notes, Outcome, Program, Scholarship, Timeline, University,
};

/// Everything extracted for one university
#[derive(Debug, Clone, Default)]
pub struct UniversityBundle {
    pub university: University,
    pub programs: Vec<Program>,
    pub labs: Vec<Lab>,
    pub scholarships: Vec<Scholarship>,
    pub admission: Admission,
    pub cost: CostOfLiving,
    pub outcome: Outcome,
    pub notes: Vec<Notes>,
    pub timelines: Vec<Timeline>,
}

/// Accumulated output tables for a crawl
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub universities: Vec<University>,
    pub programs: Vec<Program>,
    pub labs: Vec<Lab>,
    pub scholarships: Vec<Scholarship>,
    pub admissions: Vec<Admission>,
    pub costs: Vec<CostOfLiving>,
    pub outcomes: Vec<Outcome>,
    pub notes: Vec<Notes>,
    pub timelines: Vec<Timeline>,
}

impl Tables {
    /// Appends one university's records to the tables
    pub fn append(&mut self, bundle: UniversityBundle) {
        self.universities.push(bundle.university);
        self.programs.extend(bundle.programs);
        self.labs.extend(bundle.labs);
        self.scholarships.extend(bundle.scholarships);
        self.admissions.push(bundle.admission);
        self.costs.push(bundle.cost);
        self.outcomes.push(bundle.outcome);
        self.notes.extend(bundle.notes);
        self.timelines.extend(bundle.timelines);
    }

    /// Row counts per sheet, in sheet order
    pub fn counts(&self) -> Vec<(&'static str, usize)> {
        vec![
            (University::SHEET, self.universities.len()),
            (Program::SHEET, self.programs.len()),
            (Lab::SHEET, self.labs.len()),
            (Scholarship::SHEET, self.scholarships.len()),
            (Admission::SHEET, self.admissions.len()),
            (CostOfLiving::SHEET, self.costs.len()),
            (Outcome::SHEET, self.outcomes.len()),
            (Notes::SHEET, self.notes.len()),
            (Timeline::SHEET, self.timelines.len()),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.universities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_complete<R: Record + Default>() {
        let cells = R::default().cells();
        assert_eq!(cells.len(), R::COLUMNS.len(), "{} width", R::SHEET);
    }

    #[test]
    fn test_every_record_emits_every_column() {
        assert_complete::<University>();
        assert_complete::<Program>();
        assert_complete::<Lab>();
        assert_complete::<Scholarship>();
        assert_complete::<Admission>();
        assert_complete::<CostOfLiving>();
        assert_complete::<Outcome>();
        assert_complete::<Notes>();
        assert_complete::<Timeline>();
    }

    #[test]
    fn test_unknown_facts_render_as_sentinel() {
        let cells = University::default().cells();
        let year_column = University::COLUMNS
            .iter()
            .position(|c| *c == "Year Established")
            .unwrap();
        assert_eq!(cells[year_column], NOT_AVAILABLE);
    }

    #[test]
    fn test_user_fill_records_render_empty() {
        let notes = Notes {
            notes_id: "NOT00000000".to_string(),
            ..Default::default()
        };
        let cells = notes.cells();
        assert_eq!(cells[0], "NOT00000000");
        assert!(cells[3..].iter().all(String::is_empty));
    }

    #[test]
    fn test_append_accumulates() {
        let mut tables = Tables::default();
        let bundle = UniversityBundle {
            programs: vec![Program::default(), Program::default()],
            ..Default::default()
        };
        tables.append(bundle);

        let counts = tables.counts();
        assert_eq!(counts[0], ("1_University", 1));
        assert_eq!(counts[1], ("2_Program", 2));
        assert_eq!(counts[4], ("5_Admission", 1));
    }
}
