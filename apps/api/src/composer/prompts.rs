// Prompt text for application package generation.
// Placeholders are `{name}` and are filled in a single pass by composer::fill_template.

/// Instruction template. Placeholders:
/// {output_language}, {company}, {position}, {salary}, {style_label}, {style_guidance},
/// {email_register}, {cover_letter_register}, {skills_block}, {job_description}, {cv_block}
pub const APPLICATION_PROMPT_TEMPLATE: &str = r#"ROLE:
You are a senior HR technologist and ATS optimisation expert.
Write job application materials in {output_language} that pass AI-based screening systems
(bot-friendly) while remaining compelling to a human reader.

INPUT PARAMETERS:
- COMPANY: {company}
- POSITION: {position}
- SALARY: {salary}
- STYLE: {style_label}
  {style_guidance}
- AI_SKILLS (self-rated, 1-5 scale):
{skills_block}

JOB DESCRIPTION:
{job_description}

{cv_block}

STRATEGY AND DATA CHECKS:
1. ATS AND AI-BOT OPTIMISATION: Use the keywords of the job description naturally.
2. CV INTEGRITY: Pay close attention to the accuracy of the extracted CV data.
3. SKILL ALIGNMENT: Score how well each competency matches the role (0-100).
4. REGISTER:
   - emailBody: {email_register}.
   - coverLetter: {cover_letter_register}.
5. EMPHASIS: In emailBody, coverLetter and cvAnalysis put the most important data points,
   keywords and findings in bold using Markdown **text** markers.

OUTPUT REQUIREMENTS:
- subject: SHORT but highly attention-grabbing, motivating subject line.
- emailBody: DETAILED (at least 1000 characters), persuasive message with bold highlights.
- coverLetter: Professional document with a modern structure and bold highlights.
- salaryNote: The salary expectation woven in elegantly. Omit if no salary was given.
- cvAnalysis: Detailed review of the extracted CV data and any logical inconsistencies,
  with critical points in bold.
- skillAlignment: An array of exactly 5 objects with "label" and integer "score".

Respond with a single JSON object only."#;

/// CV block when the CV was pasted as text. Placeholder: {cv_text}
pub const CV_TEXT_BLOCK: &str = "CV (extracted text):\n{cv_text}";

/// CV block when the CV was attached as a document.
pub const CV_ATTACHMENT_BLOCK: &str = "NOTE: The applicant's CV is attached as a document \
    (PDF/Word). Analyse the attachment thoroughly and treat it as the CV.";

/// Substituted for {salary} when the applicant gave no expectation.
pub const SALARY_NOT_GIVEN: &str = "Not specified";
