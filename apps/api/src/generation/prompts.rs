// Prompt construction for Statement of Purpose generation.
// The system prompt is shared through llm_client::prompts.

use crate::models::sop::ApplicantProfile;

const NOT_SPECIFIED: &str = "Not specified";
const NONE_SPECIFIED: &str = "None specified";

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

/// Builds the user prompt embedding every profile field.
///
/// Blank GPA and future plans render as "Not specified"; blank background fields
/// render as "None specified". Required fields are embedded as given.
pub fn build_sop_prompt(p: &ApplicantProfile) -> String {
    format!(
        r#"Create a compelling Statement of Purpose for a university application based on the following information:

APPLICANT INFORMATION:
- Name: {name}
- Email: {email}
- Target University: {university}
- Target Program: {program}
- Current Education: {education}
- GPA: {gpa}

BACKGROUND & EXPERIENCE:
- Work Experience: {work}
- Research Experience: {research}
- Extracurricular Activities: {extracurricular}
- Achievements & Awards: {achievements}
- Technical Skills: {skills}

GOALS & MOTIVATION:
- Career Goals: {career_goals}
- Why This Program: {why_program}
- Why This University: {why_university}
- Future Plans: {future_plans}

INSTRUCTIONS:
1. Create a well-structured, professional Statement of Purpose (500-800 words)
2. Start with a compelling introduction that captures attention
3. Organize content into logical sections with smooth transitions
4. Use specific examples and details from the applicant's background
5. Demonstrate genuine interest in the program and university
6. Show how the applicant's background aligns with their goals
7. End with a strong conclusion that reinforces their fit for the program
8. Write in a professional but engaging tone
9. Avoid generic statements - make it personal and specific
10. Ensure the SOP flows naturally and tells a coherent story

FORMAT:
- Use proper paragraph structure
- Include a clear introduction, body paragraphs, and conclusion
- Make it easy to read with good transitions
- Keep sentences varied in length and structure

Write in natural, human language with a personal touch. Keep it easy to understand and avoid overly technical phrasing."#,
        name = p.full_name,
        email = p.email,
        university = p.target_university,
        program = p.target_program,
        education = p.current_education,
        gpa = or_placeholder(&p.gpa, NOT_SPECIFIED),
        work = or_placeholder(&p.work_experience, NONE_SPECIFIED),
        research = or_placeholder(&p.research_experience, NONE_SPECIFIED),
        extracurricular = or_placeholder(&p.extracurricular_activities, NONE_SPECIFIED),
        achievements = or_placeholder(&p.achievements, NONE_SPECIFIED),
        skills = or_placeholder(&p.skills, NONE_SPECIFIED),
        career_goals = p.career_goals,
        why_program = p.why_this_program,
        why_university = p.why_this_university,
        future_plans = or_placeholder(&p.future_plans, NOT_SPECIFIED),
    )
}
