//! Template generator: renders a complete Statement of Purpose from an
//! `ApplicantProfile` without any network call.
//!
//! Used directly for offline generation and as the fallback whenever the LLM
//! call fails. Every optional field goes through [`present`]: a blank or
//! whitespace-only value is treated as absent and its block is omitted.
//! Rendering never fails.

use serde::{Deserialize, Serialize};

use crate::models::sop::ApplicantProfile;

const SALUTATION: &str = "Dear Admissions Committee,";
const SIGN_OFF: &str = "Sincerely,";

/// Tonal variant of the rendered document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStyle {
    #[default]
    Formal,
    Conversational,
    Technical,
}

impl DocumentStyle {
    fn replacements(self) -> &'static [(&'static str, &'static str)] {
        match self {
            DocumentStyle::Formal => &[],
            DocumentStyle::Conversational => &[
                (SALUTATION, "Hi there!"),
                (SIGN_OFF, "Best regards,"),
                ("I am writing to express", "I wanted to share"),
            ],
            DocumentStyle::Technical => &[
                (SALUTATION, "To Whom It May Concern,"),
                ("I am excited to apply", "I am submitting my application"),
                ("I look forward to", "I anticipate"),
            ],
        }
    }

    /// Literal find/replace over a fully assembled document.
    pub fn apply(self, document: &str) -> String {
        self.replacements()
            .iter()
            .fold(document.to_string(), |doc, (from, to)| doc.replace(from, to))
    }
}

/// Returns the value when it has non-whitespace content.
fn present(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Renders the five sections, separated by one blank line each.
/// An Experience section with no content is left out entirely.
pub fn render_statement(profile: &ApplicantProfile) -> String {
    [
        introduction(profile),
        academic_background(profile),
        experience(profile),
        motivation(profile),
        conclusion(profile),
    ]
    .into_iter()
    .filter(|section| !section.is_empty())
    .collect::<Vec<_>>()
    .join("\n\n")
}

/// Render, apply the tonal variant, then normalize whitespace.
/// This is the text the service hands out whenever the template path is taken.
pub fn render_enhanced(profile: &ApplicantProfile, style: DocumentStyle) -> String {
    normalize_whitespace(&style.apply(&render_statement(profile)))
}

/// Strips trailing whitespace from every line, collapses runs of blank lines
/// to a single blank line and trims the document. Idempotent.
pub fn normalize_whitespace(document: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for line in document.lines().map(str::trim_end) {
        if line.is_empty() && out.last().is_some_and(|prev| prev.is_empty()) {
            continue;
        }
        out.push(line);
    }
    out.join("\n").trim().to_string()
}

fn introduction(p: &ApplicantProfile) -> String {
    let status = match present(&p.current_education) {
        Some(education) => format!("currently pursuing {education}"),
        None => "a graduate with a strong academic background".to_string(),
    };

    format!(
        "Statement of Purpose\n\n{SALUTATION}\n\n\
         I am writing to express my strong interest in the {program} program at {university}. \
         My name is {name}, and I am {status}. \
         I am excited to apply for this program as it represents the perfect next step in my \
         academic and professional journey, aligning seamlessly with my background, research \
         interests, and long-term career aspirations.",
        program = p.target_program,
        university = p.target_university,
        name = p.full_name,
    )
}

fn academic_background(p: &ApplicantProfile) -> String {
    let education = present(&p.current_education).unwrap_or("my education");

    let mut section = format!(
        "Academic Background\n\n\
         My academic journey has been driven by a deep passion for learning and a commitment \
         to excellence. I have completed {education} with a strong foundation in my field of study."
    );

    if let Some(gpa) = present(&p.gpa) {
        section.push_str(&format!(
            " I have maintained a GPA of {gpa}, demonstrating my dedication to academic excellence."
        ));
    }

    if let Some(achievements) = present(&p.achievements) {
        section.push_str(&format!(
            "\n\nNotable achievements include {}.",
            achievements.to_lowercase()
        ));
    }

    section.push_str(&format!(
        "\n\nThroughout my studies, I have actively engaged in coursework that has prepared me \
         for advanced study in {}.",
        p.target_program
    ));

    section
}

fn experience(p: &ApplicantProfile) -> String {
    let mut blocks = Vec::new();

    if let Some(research) = present(&p.research_experience) {
        blocks.push(format!("Research Experience\n\n{research}"));
    }
    if let Some(work) = present(&p.work_experience) {
        blocks.push(format!("Professional Experience\n\n{work}"));
    }
    if let Some(skills) = present(&p.skills) {
        blocks.push(format!(
            "Technical Skills and Competencies\n\n\
             I have developed strong technical skills in {}, which I believe will be valuable \
             assets in the {} program.",
            skills.to_lowercase(),
            p.target_program
        ));
    }
    if let Some(activities) = present(&p.extracurricular_activities) {
        blocks.push(format!("Extracurricular Activities\n\n{activities}"));
    }

    blocks.join("\n\n")
}

fn motivation(p: &ApplicantProfile) -> String {
    let mut blocks = vec!["Motivation and Goals".to_string()];

    if let Some(goals) = present(&p.career_goals) {
        blocks.push(format!("Career Goals\n\n{goals}"));
    }
    if let Some(why_program) = present(&p.why_this_program) {
        blocks.push(format!("Why This Program\n\n{why_program}"));
    }
    if let Some(why_university) = present(&p.why_this_university) {
        blocks.push(format!(
            "Why {}\n\n{why_university}",
            p.target_university
        ));
    }

    blocks.join("\n\n")
}

fn conclusion(p: &ApplicantProfile) -> String {
    let mut closing = format!(
        "I am confident that my academic background, professional experience, and passion for \
         {} make me an excellent candidate for this program. ",
        p.target_program
    );

    if let Some(plans) = present(&p.future_plans) {
        closing.push_str(plans);
        closing.push(' ');
    }

    closing.push_str(&format!(
        "I am excited about the opportunity to contribute to the academic community at {} and \
         to learn from distinguished faculty and fellow students. I look forward to the \
         possibility of joining your program and contributing to the university's tradition \
         of excellence.",
        p.target_university
    ));

    format!(
        "Conclusion\n\n{closing}\n\n\
         Thank you for considering my application. I am available for an interview at your \
         convenience and would welcome the opportunity to discuss my qualifications in person.\
         \n\n{SIGN_OFF}\n{}",
        p.full_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_profile() -> ApplicantProfile {
        ApplicantProfile {
            full_name: "Jane Doe".to_string(),
            target_university: "Acme University".to_string(),
            target_program: "MS in X".to_string(),
            career_goals: "Goal text".to_string(),
            why_this_program: "Program text".to_string(),
            why_this_university: "Uni text".to_string(),
            ..Default::default()
        }
    }

    fn full_profile() -> ApplicantProfile {
        ApplicantProfile {
            full_name: "Sarah Johnson".to_string(),
            email: "sarah.johnson@email.com".to_string(),
            target_university: "Stanford University".to_string(),
            target_program: "Master of Science in Computer Science".to_string(),
            current_education: "Bachelor's Degree".to_string(),
            gpa: "3.8/4.0".to_string(),
            work_experience: "Software Engineer at TechCorp for 2 years.".to_string(),
            research_experience: "NLP research under Dr. Smith.".to_string(),
            extracurricular_activities: "President of the Computer Science Club.".to_string(),
            achievements: "Dean's List, Outstanding Student Award".to_string(),
            skills: "Python, Rust, TensorFlow".to_string(),
            career_goals: "Become a research scientist in AI.".to_string(),
            why_this_program: "Rigorous coursework and research.".to_string(),
            why_this_university: "Collaborative environment.".to_string(),
            future_plans: "I plan to pursue a PhD.".to_string(),
        }
    }

    #[test]
    fn test_minimal_profile_scenario() {
        let doc = render_statement(&minimal_profile());
        assert!(doc.starts_with("Statement of Purpose\n\nDear Admissions Committee,"));
        assert!(doc.ends_with("Sincerely,\nJane Doe"));
        assert!(!doc.contains("GPA of"));
        assert!(doc.contains("a graduate with a strong academic background"));
        assert!(doc.contains("I have completed my education with"));
    }

    #[test]
    fn test_blank_optional_fields_keep_fixed_sections_only() {
        let doc = render_statement(&minimal_profile());
        for header in ["Academic Background", "Motivation and Goals", "Conclusion"] {
            assert!(doc.contains(header), "missing {header}");
        }
        for header in [
            "Research Experience",
            "Professional Experience",
            "Technical Skills and Competencies",
            "Extracurricular Activities",
            "Notable achievements",
        ] {
            assert!(!doc.contains(header), "unexpected {header}");
        }
        assert!(!doc.contains("\n\n\n"), "sections separated by one blank line");
    }

    #[test]
    fn test_full_profile_section_order() {
        let doc = render_statement(&full_profile());
        let order = [
            "Statement of Purpose",
            "Academic Background",
            "Research Experience",
            "Professional Experience",
            "Technical Skills and Competencies",
            "Extracurricular Activities",
            "Motivation and Goals",
            "Career Goals",
            "Why This Program",
            "Why Stanford University",
            "Conclusion",
        ];
        let positions: Vec<usize> = order.iter().map(|h| doc.find(h).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
        assert!(doc.contains("currently pursuing Bachelor's Degree"));
        assert!(doc.contains("I plan to pursue a PhD. I am excited about"));
    }

    #[test]
    fn test_gpa_clause_uses_value_verbatim() {
        let mut profile = minimal_profile();
        profile.gpa = "3.8/4.0".to_string();
        assert!(render_statement(&profile).contains("GPA of 3.8/4.0"));

        profile.gpa = " \t ".to_string();
        assert!(!render_statement(&profile).contains("GPA of"));
    }

    #[test]
    fn test_skills_and_achievements_are_restated_lowercase() {
        let doc = render_statement(&full_profile());
        assert!(doc.contains("strong technical skills in python, rust, tensorflow, which"));
        assert!(doc.contains("Notable achievements include dean's list, outstanding student award."));
    }

    #[test]
    fn test_whitespace_only_fields_are_absent() {
        let mut profile = minimal_profile();
        profile.research_experience = "   \n ".to_string();
        profile.future_plans = "\t".to_string();
        profile.current_education = "  ".to_string();
        let doc = render_statement(&profile);
        assert!(!doc.contains("Research Experience"));
        assert!(doc.contains("a graduate with a strong academic background"));
        assert!(doc.contains("candidate for this program. I am excited about"));
    }

    #[test]
    fn test_normalize_whitespace() {
        let input = "Title  \n\n\n\nBody line\t\n \n\n\nEnd   \n\n";
        assert_eq!(normalize_whitespace(input), "Title\n\nBody line\n\nEnd");
    }

    #[test]
    fn test_normalize_whitespace_is_idempotent() {
        let samples = [
            render_statement(&full_profile()),
            "a\n\n\n\nb  \n   \n\n c\t".to_string(),
            String::new(),
            "\n\n\n".to_string(),
        ];
        for sample in samples {
            let once = normalize_whitespace(&sample);
            assert_eq!(normalize_whitespace(&once), once);
        }
    }

    #[test]
    fn test_conversational_style() {
        let doc = DocumentStyle::Conversational.apply(&render_statement(&minimal_profile()));
        assert!(doc.contains("Hi there!"));
        assert!(doc.contains("I wanted to share my strong interest"));
        assert!(doc.ends_with("Best regards,\nJane Doe"));
        assert!(!doc.contains("Dear Admissions Committee,"));
    }

    #[test]
    fn test_technical_style() {
        let doc = DocumentStyle::Technical.apply(&render_statement(&minimal_profile()));
        assert!(doc.contains("To Whom It May Concern,"));
        assert!(doc.contains("I am submitting my application for this program"));
        assert!(doc.contains("I anticipate the possibility"));
        assert!(doc.ends_with("Sincerely,\nJane Doe"));
    }

    #[test]
    fn test_formal_style_is_identity() {
        let base = render_statement(&full_profile());
        assert_eq!(DocumentStyle::Formal.apply(&base), base);
    }

    #[test]
    fn test_style_deserializes_lowercase() {
        let style: DocumentStyle = serde_json::from_str("\"conversational\"").unwrap();
        assert_eq!(style, DocumentStyle::Conversational);
    }

    #[test]
    fn test_render_enhanced_keeps_signature() {
        let doc = render_enhanced(&minimal_profile(), DocumentStyle::Formal);
        assert!(doc.starts_with("Statement of Purpose\n\nDear Admissions Committee,"));
        assert!(doc.ends_with("Sincerely,\nJane Doe"));
    }
}
