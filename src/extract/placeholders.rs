//! User-fill placeholder rows
//!
//! The Notes and Timeline sheets are filled in by hand. The crawl only emits
//! one row per university and per program, carrying the identity columns.

use super::UniversityContext;
use crate::records::{generate_id, IdKind, Notes, Program, Timeline, NOT_AVAILABLE};

/// Status of a timeline row nobody has worked on yet
pub const NOT_STARTED: &str = "Not Started";

pub fn notes(ctx: &UniversityContext, program: Option<&Program>) -> Notes {
    let prog_id = program.map(|p| p.prog_id.clone()).unwrap_or_default();
    Notes {
        notes_id: generate_id(IdKind::Notes, &[ctx.name.as_str(), prog_id.as_str()]),
        univ_id: ctx.univ_id.clone(),
        prog_id,
        ..Default::default()
    }
}

pub fn timeline(ctx: &UniversityContext, program: Option<&Program>) -> Timeline {
    let prog_id = program.map(|p| p.prog_id.clone()).unwrap_or_default();
    Timeline {
        timeline_id: generate_id(IdKind::Timeline, &[ctx.name.as_str(), prog_id.as_str()]),
        univ_id: ctx.univ_id.clone(),
        program_name: program.map(|p| p.name.clone()).unwrap_or_default(),
        university: ctx.name.clone(),
        program_deadline: program
            .and_then(|p| p.application_deadline.clone())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        status: NOT_STARTED.to_string(),
        prog_id,
        ..Default::default()
    }
}

/// One Notes and one Timeline row for the university, then one of each per program
pub fn for_university(ctx: &UniversityContext, programs: &[Program]) -> (Vec<Notes>, Vec<Timeline>) {
    let targets = std::iter::once(None).chain(programs.iter().map(Some));
    targets
        .map(|program| (notes(ctx, program), timeline(ctx, program)))
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::UniversityTarget;
    use url::Url;

    fn ctx() -> UniversityContext {
        let target = UniversityTarget {
            name: "Example University".to_string(),
            city: "Madrid".to_string(),
            country: "España".to_string(),
            base_url: Url::parse("https://example.edu/").unwrap(),
        };
        UniversityContext::new(&target, "UNIV0000ABCD")
    }

    fn program(name: &str, deadline: Option<&str>) -> Program {
        Program {
            prog_id: format!("PROG-{}", name),
            univ_id: "UNIV0000ABCD".to_string(),
            name: name.to_string(),
            application_deadline: deadline.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_university_and_program_rows() {
        let programs = vec![
            program("MSc Data Science", Some("March 1, 2025")),
            program("MSc Mathematics", None),
        ];
        let (notes, timelines) = for_university(&ctx(), &programs);

        assert_eq!(notes.len(), 3);
        assert_eq!(timelines.len(), 3);

        assert_eq!(notes[0].prog_id, "");
        assert_eq!(timelines[0].program_name, "");
        assert_eq!(timelines[0].program_deadline, NOT_AVAILABLE);

        assert_eq!(timelines[1].program_name, "MSc Data Science");
        assert_eq!(timelines[1].program_deadline, "March 1, 2025");
        assert_eq!(timelines[2].program_deadline, NOT_AVAILABLE);
        assert!(timelines.iter().all(|t| t.status == NOT_STARTED));
        assert!(timelines.iter().all(|t| t.university == "Example University"));
        assert!(notes.iter().all(|n| n.interest_level.is_empty() && n.final_decision.is_empty()));
    }

    #[test]
    fn test_ids_distinct_per_program() {
        let programs = vec![program("A", None), program("B", None)];
        let (notes, timelines) = for_university(&ctx(), &programs);
        assert_ne!(notes[1].notes_id, notes[2].notes_id);
        assert_ne!(timelines[0].timeline_id, timelines[1].timeline_id);
        assert!(notes[0].notes_id.starts_with("NOT"));
        assert!(timelines[0].timeline_id.starts_with("TL"));
    }
}
