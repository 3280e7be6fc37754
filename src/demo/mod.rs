//! # Demonstration Script
//!
//! The fixed walk-through of vector lifetimes. Each [`Section`] runs inside
//! its own scope so that every instance it creates is destroyed before the
//! next section starts. Narration (headers, printed vectors, use counts) goes
//! to the writer passed to [`run`]; lifecycle events go to the [`Tracer`].

use crate::errors::{LifetimeError, Result};
use crate::ownership::{make_shared, make_unique, normalize_in_place, transfer_ownership};
use crate::trace::Tracer;
use crate::vector::Vector3D;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

/// One part of the demonstration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    Creation,
    Copy,
    Move,
    UniqueOwnership,
    SharedOwnership,
    Factory,
}

impl Section {
    /// All sections in running order
    pub const ALL: [Section; 6] = [
        Section::Creation,
        Section::Copy,
        Section::Move,
        Section::UniqueOwnership,
        Section::SharedOwnership,
        Section::Factory,
    ];

    /// 1-based position in the script
    pub fn number(self) -> u8 {
        match self {
            Section::Creation => 1,
            Section::Copy => 2,
            Section::Move => 3,
            Section::UniqueOwnership => 4,
            Section::SharedOwnership => 5,
            Section::Factory => 6,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Section::Creation => "Creating objects",
            Section::Copy => "Copying",
            Section::Move => "Moving",
            Section::UniqueOwnership => "Unique ownership",
            Section::SharedOwnership => "Shared ownership",
            Section::Factory => "Factory function",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number(), self.title())
    }
}

impl TryFrom<u8> for Section {
    type Error = LifetimeError;

    fn try_from(number: u8) -> Result<Self> {
        Section::ALL
            .iter()
            .copied()
            .find(|s| s.number() == number)
            .ok_or_else(|| LifetimeError::UnknownSection(number.to_string()))
    }
}

impl FromStr for Section {
    type Err = LifetimeError;

    fn from_str(s: &str) -> Result<Self> {
        let number: u8 = s
            .trim()
            .parse()
            .map_err(|_| LifetimeError::UnknownSection(s.to_string()))?;
        Section::try_from(number)
    }
}

/// Which sections to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    sections: Vec<Section>,
}

impl DemoConfig {
    /// Runs only the given sections, in script order, each at most once
    ///
    /// An empty selection means every section.
    pub fn only(sections: impl IntoIterator<Item = Section>) -> Self {
        let mut sections: Vec<Section> = sections.into_iter().collect();
        sections.sort();
        sections.dedup();
        if sections.is_empty() {
            return Self::default();
        }
        DemoConfig { sections }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        DemoConfig {
            sections: Section::ALL.to_vec(),
        }
    }
}

/// Runs the demonstration
///
/// # Examples
///
/// ```rust
/// use lifetrace::demo::{run, DemoConfig, Section};
/// use lifetrace::trace::Tracer;
///
/// let (tracer, recording) = Tracer::recording();
/// let mut out = Vec::new();
/// run(&tracer, &mut out, &DemoConfig::only([Section::Factory])).unwrap();
///
/// let text = String::from_utf8(out).unwrap();
/// assert!(text.contains("(20, 21, 22)"));
/// assert_eq!(recording.count("destroyed"), 1);
/// ```
pub fn run<W: Write>(tracer: &Tracer, out: &mut W, config: &DemoConfig) -> Result<()> {
    writeln!(out, "=== Vector3D lifetime demonstration ===")?;
    writeln!(out)?;

    for &section in config.sections() {
        log::info!("running section {}", section);
        writeln!(out, "{}:", section)?;
        run_section(section, tracer, out)?;
        writeln!(out)?;
    }

    writeln!(out, "=== All sections completed ===")?;
    Ok(())
}

/// Runs one section; everything it creates is dropped before it returns
pub fn run_section<W: Write>(section: Section, tracer: &Tracer, out: &mut W) -> Result<()> {
    match section {
        Section::Creation => creation(tracer),
        Section::Copy => copying(tracer),
        Section::Move => moving(tracer),
        Section::UniqueOwnership => unique_ownership(tracer, out),
        Section::SharedOwnership => shared_ownership(tracer, out),
        Section::Factory => factory(tracer, out),
    }
}

fn creation(tracer: &Tracer) -> Result<()> {
    let _v1 = Vector3D::default_in(tracer);
    let _v2 = Vector3D::new_in(tracer, 1.0, 2.0, 3.0);
    Ok(())
}

fn copying(tracer: &Tracer) -> Result<()> {
    let original = Vector3D::new_in(tracer, 4.0, 5.0, 6.0);
    let _copy = original.try_clone()?;
    let mut another_copy = Vector3D::default_in(tracer);
    another_copy.try_copy_assign(&original)?;
    Ok(())
}

fn moving(tracer: &Tracer) -> Result<()> {
    let mut source = Vector3D::new_in(tracer, 7.0, 8.0, 9.0);
    let _moved = Vector3D::move_from(&mut source);

    let mut target = Vector3D::default_in(tracer);
    target.move_assign_owned(Vector3D::new_in(tracer, 10.0, 11.0, 12.0));
    Ok(())
}

fn unique_ownership<W: Write>(tracer: &Tracer, out: &mut W) -> Result<()> {
    let mut unique = make_unique(tracer, 13.0, 14.0, 15.0);
    if let Some(v) = unique.get() {
        writeln!(out, "Original vector: {}", v)?;
    }

    let new_owner = transfer_ownership(unique.take());
    if let Some(v) = new_owner.get() {
        writeln!(out, "After ownership transfer: {}", v)?;
    }

    if unique.is_null() {
        writeln!(out, "Original handle is now null (ownership transferred)")?;
    }
    Ok(())
}

fn shared_ownership<W: Write>(tracer: &Tracer, out: &mut W) -> Result<()> {
    let shared = make_shared(tracer, 3.0, 4.0, 0.0);
    {
        let v = shared.borrow();
        writeln!(out, "Original vector: {}, length: {}", *v, v.try_length()?)?;
    }

    let _second_owner = shared.clone();
    writeln!(out, "Use count after copying: {}", shared.use_count())?;

    let outcome = normalize_in_place(Some(shared.clone()));
    writeln!(out, "{}", outcome.diagnostic())?;

    writeln!(out, "Use count before scope end: {}", shared.use_count())?;
    Ok(())
}

fn factory<W: Write>(tracer: &Tracer, out: &mut W) -> Result<()> {
    let factory_vec = make_unique(tracer, 20.0, 21.0, 22.0);
    if let Some(v) = factory_vec.get() {
        writeln!(out, "{}", v)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::LifecycleEvent::*;
    use rstest::rstest;

    fn run_one(section: Section) -> (String, Vec<crate::trace::LifecycleEvent>) {
        let (tracer, recording) = Tracer::recording();
        let mut out = Vec::new();
        run_section(section, &tracer, &mut out).unwrap();
        (String::from_utf8(out).unwrap(), recording.events())
    }

    #[rstest]
    #[case("1", Section::Creation)]
    #[case("4", Section::UniqueOwnership)]
    #[case(" 6 ", Section::Factory)]
    fn test_parse_section(#[case] input: &str, #[case] expected: Section) {
        assert_eq!(input.parse::<Section>().unwrap(), expected);
    }

    #[rstest]
    #[case("0")]
    #[case("7")]
    #[case("move")]
    fn test_parse_section_rejects(#[case] input: &str) {
        assert!(matches!(
            input.parse::<Section>(),
            Err(LifetimeError::UnknownSection(_))
        ));
    }

    #[test]
    fn test_section_numbering() {
        for (i, section) in Section::ALL.iter().enumerate() {
            assert_eq!(section.number() as usize, i + 1);
            assert_eq!(Section::try_from(section.number()).unwrap(), *section);
        }
        assert_eq!(Section::Move.to_string(), "3. Moving");
    }

    #[test]
    fn test_config_selection() {
        assert_eq!(DemoConfig::default().sections(), &Section::ALL);

        let config = DemoConfig::only([Section::Factory, Section::Copy, Section::Factory]);
        assert_eq!(config.sections(), &[Section::Copy, Section::Factory]);

        assert_eq!(DemoConfig::only(Vec::new()), DemoConfig::default());
    }

    #[test]
    fn test_creation_section() {
        let (text, events) = run_one(Section::Creation);
        assert!(text.is_empty());
        assert_eq!(
            events,
            vec![
                DefaultConstructed,
                Constructed { x: 1.0, y: 2.0, z: 3.0 },
                Destroyed { coords: Some([1.0, 2.0, 3.0]) },
                Destroyed { coords: Some([0.0, 0.0, 0.0]) },
            ]
        );
    }

    #[test]
    fn test_copy_section() {
        let (_, events) = run_one(Section::Copy);
        assert_eq!(
            events,
            vec![
                Constructed { x: 4.0, y: 5.0, z: 6.0 },
                CopyConstructed,
                DefaultConstructed,
                CopyAssigned,
                Destroyed { coords: Some([4.0, 5.0, 6.0]) },
                Destroyed { coords: Some([4.0, 5.0, 6.0]) },
                Destroyed { coords: Some([4.0, 5.0, 6.0]) },
            ]
        );
    }

    #[test]
    fn test_move_section() {
        let (_, events) = run_one(Section::Move);
        assert_eq!(
            events,
            vec![
                Constructed { x: 7.0, y: 8.0, z: 9.0 },
                MoveConstructed,
                DefaultConstructed,
                Constructed { x: 10.0, y: 11.0, z: 12.0 },
                MoveAssigned,
                Destroyed { coords: None },
                Destroyed { coords: Some([10.0, 11.0, 12.0]) },
                Destroyed { coords: Some([7.0, 8.0, 9.0]) },
                Destroyed { coords: None },
            ]
        );
    }

    #[test]
    fn test_unique_ownership_section() {
        let (text, events) = run_one(Section::UniqueOwnership);
        assert_eq!(
            text,
            "Original vector: (13, 14, 15)\n\
             After ownership transfer: (26, 14, 15)\n\
             Original handle is now null (ownership transferred)\n"
        );
        assert_eq!(
            events,
            vec![
                Constructed { x: 13.0, y: 14.0, z: 15.0 },
                Destroyed { coords: Some([26.0, 14.0, 15.0]) },
            ]
        );
    }

    #[test]
    fn test_shared_ownership_section() {
        let (text, events) = run_one(Section::SharedOwnership);
        assert_eq!(
            text,
            "Original vector: (3, 4, 0), length: 5\n\
             Use count after copying: 2\n\
             Normalized vector: (0.6, 0.8, 0)\n\
             Use count before scope end: 2\n"
        );
        // Two holders, one destruction
        assert_eq!(
            events,
            vec![
                Constructed { x: 3.0, y: 4.0, z: 0.0 },
                Destroyed { coords: Some([0.6, 0.8, 0.0]) },
            ]
        );
    }

    #[test]
    fn test_factory_section() {
        let (text, events) = run_one(Section::Factory);
        assert_eq!(text, "(20, 21, 22)\n");
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_run_writes_headers() {
        let tracer = Tracer::default();
        let mut out = Vec::new();
        run(&tracer, &mut out, &DemoConfig::only([Section::Creation])).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "=== Vector3D lifetime demonstration ===\n\
             \n\
             1. Creating objects:\n\
             \n\
             === All sections completed ===\n"
        );
    }
}
