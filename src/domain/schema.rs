//! Static field schema for the application form.
//!
//! Every field the applicant can fill in is declared here exactly once,
//! together with its input shape, requirement rule and option set. The
//! store and the validator dispatch on these declarations instead of
//! checking field names.

use strum::{AsRefStr, Display, EnumCount, EnumIter, EnumString, IntoEnumIterator};

/// Message used for every plain "must not be empty" failure.
pub const REQUIRED_MESSAGE: &str = "This field is required";

/// Message used when a non-empty email does not look like `local@domain.tld`.
pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address";

/// Identifier of a single form field.
///
/// The string form (camelCase) is the key used in the JSON payload and in
/// server-reported `missingFields` lists.
///
/// # Examples
///
/// ```
/// use intake::domain::FieldId;
///
/// assert_eq!(FieldId::FullName.as_ref(), "fullName");
/// assert_eq!("declaration2".parse::<FieldId>(), Ok(FieldId::Declaration2));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    EnumIter, EnumString, AsRefStr, Display, EnumCount,
)]
#[strum(serialize_all = "camelCase")]
pub enum FieldId {
    FullName,
    Email,
    Phone,
    College,
    YearOfStudy,
    Branch,
    Cgpa,
    AlternateContact,
    Position,
    OpenToOtherPositions,
    WhyJoin,
    UniqueSkills,
    ProgrammingLanguages,
    HardwareExperience,
    SoftwareTools,
    AreasOfInterest,
    SkillLevel,
    TechnicalProjects,
    Competitions,
    TimeCommitment,
    WeekendAvailability,
    YearCommitment,
    LearnAchieve,
    TeamContribution,
    ProblemSolving,
    Questions,
    AdditionalInfo,
    HearAbout,
    Declaration1,
    Declaration2,
}

/// Themed group of fields, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, Display)]
pub enum Section {
    #[strum(to_string = "Personal Information")]
    PersonalInformation,
    #[strum(to_string = "Position Application")]
    PositionApplication,
    #[strum(to_string = "Technical Background")]
    TechnicalBackground,
    #[strum(to_string = "Project Experience")]
    ProjectExperience,
    #[strum(to_string = "Commitment & Availability")]
    CommitmentAvailability,
    #[strum(to_string = "Motivation & Goals")]
    MotivationGoals,
    #[strum(to_string = "Additional Information")]
    AdditionalInformation,
    #[strum(to_string = "Declaration")]
    Declaration,
}

/// Input shape of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, optionally capped at `max_len` characters.
    Text { max_len: Option<usize> },
    /// Exactly one option (or none) from a fixed list.
    SingleChoice(&'static [&'static str]),
    /// Any subset of a fixed list, kept in insertion order.
    MultiChoice(&'static [&'static str]),
    /// Consent checkbox.
    Boolean,
}

impl FieldKind {
    /// Short name of the shape, used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Text { .. } => "text",
            FieldKind::SingleChoice(_) => "single choice",
            FieldKind::MultiChoice(_) => "multi choice",
            FieldKind::Boolean => "boolean",
        }
    }

    /// Options offered by a choice field; empty for text and boolean fields.
    pub fn options(&self) -> &'static [&'static str] {
        match self {
            FieldKind::SingleChoice(options) | FieldKind::MultiChoice(options) => options,
            FieldKind::Text { .. } | FieldKind::Boolean => &[],
        }
    }
}

/// Validation rule attached to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Optional,
    /// Value must be non-empty; the message is reported otherwise.
    NonEmpty(&'static str),
    /// Boolean must be checked; the message is reported otherwise.
    MustBeTrue(&'static str),
}

impl Requirement {
    pub fn is_required(&self) -> bool {
        !matches!(self, Requirement::Optional)
    }
}

/// Extra shape check applied to non-empty text values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Email,
}

/// Full declaration of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub id: FieldId,
    pub section: Section,
    pub label: &'static str,
    pub kind: FieldKind,
    pub requirement: Requirement,
    pub format: Option<TextFormat>,
}

const YEARS: &[&str] = &["1st Year", "2nd Year", "3rd Year", "4th Year", "Graduate"];
const POSITIONS: &[&str] = &[
    "President/Vice President",
    "Overall Coordinator",
    "Project Manager",
    "Core Member",
];
const YES_NO: &[&str] = &["Yes", "No"];
const YES_NO_SOMETIMES: &[&str] = &["Yes", "No", "Sometimes"];
const LANGUAGES: &[&str] = &[
    "Python", "C++", "Java", "MATLAB", "JavaScript", "R", "Assembly", "Other",
];
const HARDWARE: &[&str] = &[
    "Arduino",
    "Raspberry Pi",
    "PCB Design",
    "Microcontrollers",
    "Sensors",
    "FPGA",
    "DSP",
    "Other",
];
const SOFTWARE: &[&str] = &[
    "AutoCAD", "SolidWorks", "Proteus", "KiCAD", "ROS", "TensorFlow", "OpenCV", "Other",
];
const INTERESTS: &[&str] = &[
    "Robotics",
    "AI/ML",
    "IoT",
    "Embedded Systems",
    "Signal Processing",
    "Communication Systems",
    "Computer Vision",
    "Other",
];
const SKILL_LEVELS: &[&str] = &["Beginner", "Intermediate", "Advanced"];
const TIME_COMMITMENTS: &[&str] = &[
    "2-4 hours/week",
    "5-8 hours/week",
    "9-12 hours/week",
    "12+ hours/week",
];
const SOURCES: &[&str] = &[
    "Friends",
    "Social Media",
    "Poster",
    "Faculty",
    "Website",
    "College Notice Board",
    "Other",
];

const fn text(id: FieldId, section: Section, label: &'static str, required: bool) -> FieldSpec {
    FieldSpec {
        id,
        section,
        label,
        kind: FieldKind::Text { max_len: None },
        requirement: if required { Requirement::NonEmpty(REQUIRED_MESSAGE) } else { Requirement::Optional },
        format: None,
    }
}

const fn essay(id: FieldId, section: Section, label: &'static str, max_len: usize, required: bool) -> FieldSpec {
    FieldSpec {
        kind: FieldKind::Text { max_len: Some(max_len) },
        ..text(id, section, label, required)
    }
}

const fn single(id: FieldId, section: Section, label: &'static str, options: &'static [&'static str]) -> FieldSpec {
    FieldSpec {
        id,
        section,
        label,
        kind: FieldKind::SingleChoice(options),
        requirement: Requirement::NonEmpty(REQUIRED_MESSAGE),
        format: None,
    }
}

const fn multi(id: FieldId, label: &'static str, options: &'static [&'static str]) -> FieldSpec {
    FieldSpec {
        id,
        section: Section::TechnicalBackground,
        label,
        kind: FieldKind::MultiChoice(options),
        requirement: Requirement::Optional,
        format: None,
    }
}

const fn declaration(id: FieldId, label: &'static str, message: &'static str) -> FieldSpec {
    FieldSpec {
        id,
        section: Section::Declaration,
        label,
        kind: FieldKind::Boolean,
        requirement: Requirement::MustBeTrue(message),
        format: None,
    }
}

use FieldId as F;
use Section as S;

/// The form schema, indexed by `FieldId as usize`.
pub static SCHEMA: [FieldSpec; FieldId::COUNT] = [
    text(F::FullName, S::PersonalInformation, "Full Name", true),
    FieldSpec {
        format: Some(TextFormat::Email),
        ..text(F::Email, S::PersonalInformation, "Email Address", true)
    },
    text(F::Phone, S::PersonalInformation, "Phone Number", true),
    text(F::College, S::PersonalInformation, "College/University", true),
    single(F::YearOfStudy, S::PersonalInformation, "Year of Study", YEARS),
    text(F::Branch, S::PersonalInformation, "Branch/Department", true),
    text(F::Cgpa, S::PersonalInformation, "Current CGPA/Percentage", false),
    text(F::AlternateContact, S::PersonalInformation, "Alternative Contact", false),
    single(F::Position, S::PositionApplication, "Position Applying For", POSITIONS),
    single(F::OpenToOtherPositions, S::PositionApplication, "Open to Other Positions", YES_NO),
    essay(F::WhyJoin, S::PositionApplication, "Why do you want to join?", 500, true),
    essay(F::UniqueSkills, S::PositionApplication, "What unique skills do you bring?", 500, true),
    multi(F::ProgrammingLanguages, "Programming Languages Known", LANGUAGES),
    multi(F::HardwareExperience, "Hardware Experience", HARDWARE),
    multi(F::SoftwareTools, "Software Tools", SOFTWARE),
    FieldSpec {
        requirement: Requirement::NonEmpty("Please select at least one area of interest"),
        ..multi(F::AreasOfInterest, "Areas of Interest", INTERESTS)
    },
    single(F::SkillLevel, S::TechnicalBackground, "Technical Skill Level", SKILL_LEVELS),
    single(F::TechnicalProjects, S::ProjectExperience, "Worked on technical projects?", YES_NO),
    single(F::Competitions, S::ProjectExperience, "Participated in competitions/hackathons?", YES_NO),
    single(F::TimeCommitment, S::CommitmentAvailability, "Weekly Time Commitment", TIME_COMMITMENTS),
    single(F::WeekendAvailability, S::CommitmentAvailability, "Available on Weekends", YES_NO_SOMETIMES),
    single(F::YearCommitment, S::CommitmentAvailability, "Can commit for the full year", YES_NO),
    essay(F::LearnAchieve, S::MotivationGoals, "What do you hope to learn and achieve?", 500, true),
    essay(F::TeamContribution, S::MotivationGoals, "How will you contribute to the team?", 500, true),
    essay(F::ProblemSolving, S::MotivationGoals, "Describe a problem you solved creatively", 500, true),
    essay(F::Questions, S::AdditionalInformation, "Questions for us", 300, false),
    essay(F::AdditionalInfo, S::AdditionalInformation, "Anything else to share", 300, false),
    single(F::HearAbout, S::AdditionalInformation, "How did you hear about us?", SOURCES),
    declaration(
        F::Declaration1,
        "I confirm that all information provided is accurate and complete",
        "You must confirm the accuracy of your information",
    ),
    declaration(
        F::Declaration2,
        "I understand the commitment required and am willing to actively participate",
        "You must commit to active participation",
    ),
];

impl FieldId {
    /// Returns the schema entry for this field.
    pub fn spec(self) -> &'static FieldSpec {
        &SCHEMA[self as usize]
    }

    pub fn kind(self) -> FieldKind {
        self.spec().kind
    }

    /// Looks up a field by its wire name.
    pub fn from_name(name: &str) -> Option<FieldId> {
        name.parse().ok()
    }
}

impl Section {
    /// Fields belonging to this section, in display order.
    pub fn fields(self) -> impl Iterator<Item = FieldId> {
        FieldId::iter().filter(move |field| field.spec().section == self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_is_indexed_by_field_id() {
        for (index, field) in FieldId::iter().enumerate() {
            assert_eq!(SCHEMA[index].id, field, "schema out of order at {}", index);
        }
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(FieldId::Cgpa.as_ref(), "cgpa");
        assert_eq!(FieldId::OpenToOtherPositions.as_ref(), "openToOtherPositions");
        assert_eq!(FieldId::Declaration1.as_ref(), "declaration1");
        assert_eq!(FieldId::from_name("hearAbout"), Some(FieldId::HearAbout));
        assert_eq!(FieldId::from_name("nickname"), None);
    }

    #[test]
    fn test_required_list() {
        let required: Vec<String> = FieldId::iter()
            .filter(|f| matches!(f.spec().requirement, Requirement::NonEmpty(REQUIRED_MESSAGE)))
            .map(|f| f.to_string())
            .collect();

        assert_eq!(
            required,
            vec![
                "fullName", "email", "phone", "college", "yearOfStudy", "branch",
                "position", "openToOtherPositions", "whyJoin", "uniqueSkills",
                "skillLevel", "technicalProjects", "competitions",
                "timeCommitment", "weekendAvailability", "yearCommitment",
                "learnAchieve", "teamContribution", "problemSolving", "hearAbout",
            ]
        );
    }

    #[test]
    fn test_only_declarations_are_boolean() {
        let booleans: Vec<FieldId> = FieldId::iter()
            .filter(|f| f.kind() == FieldKind::Boolean)
            .collect();
        assert_eq!(booleans, vec![FieldId::Declaration1, FieldId::Declaration2]);
        assert!(booleans.iter().all(|f| matches!(f.spec().requirement, Requirement::MustBeTrue(_))));
    }

    #[test]
    fn test_sections_cover_every_field_once() {
        let total: usize = Section::iter().map(|s| s.fields().count()).sum();
        assert_eq!(total, FieldId::COUNT);
        assert_eq!(Section::ProjectExperience.fields().collect::<Vec<_>>(),
            vec![FieldId::TechnicalProjects, FieldId::Competitions]);
    }
}
