//! Style and tone calibration: maps the user's presets to writing directives.
//!
//! The email body follows the selected tone. The cover letter is always written
//! in the formal register, whatever tone was picked.

use crate::application::models::{Style, Tone};

/// Writing directives for one style preset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDirective {
    pub label: &'static str,
    pub guidance: &'static str,
}

/// Returns the prompt directive for a style preset.
pub fn style_directive(style: Style) -> StyleDirective {
    match style {
        Style::Professional => StyleDirective {
            label: "Professional (formal, respectful)",
            guidance: "Polished, courteous and measured. Lead with credentials and fit.",
        },
        Style::SolutionOriented => StyleDirective {
            label: "Solution-oriented (operational, fast)",
            guidance: "Frame every paragraph around a problem the employer has and how the \
                candidate solves it. Favour action and outcomes over background.",
        },
        Style::Innovator => StyleDirective {
            label: "Innovator (AI and future focused)",
            guidance: "Position the candidate as a forward-looking adopter of AI tooling. \
                Highlight experiments, automation and new ways of working.",
        },
        Style::Storyteller => StyleDirective {
            label: "Storyteller (personal journey, narrative)",
            guidance: "Tell the candidate's path as a short narrative arc that ends at this role.",
        },
        Style::DataDriven => StyleDirective {
            label: "Data-driven (KPI and results focused)",
            guidance: "Quantify wherever the CV allows: percentages, volumes, time saved, revenue.",
        },
        Style::Minimalist => StyleDirective {
            label: "Minimalist (to the point, clean)",
            guidance: "Short sentences, no filler, one idea per paragraph.",
        },
        Style::Concise => StyleDirective {
            label: "Concise (extra short, direct)",
            guidance: "As brief as the format allows. State the fit and the ask directly.",
        },
    }
}

/// Register directive for the email body.
pub fn email_register(tone: Tone) -> &'static str {
    match tone {
        Tone::Informal => "informal, first-name register (address the reader informally)",
        Tone::Formal => "formal, polite register (address the reader formally)",
        Tone::Business => "neutral business register (direct and professional, no small talk)",
    }
}

/// Register directive for the cover letter. Independent of the selected tone.
pub fn cover_letter_register(_tone: Tone) -> &'static str {
    "formal, polite register in every case, even when the email is informal"
}

/// Short human label for a tone, used in prompts and option listings.
pub fn tone_label(tone: Tone) -> &'static str {
    match tone {
        Tone::Informal => "Informal",
        Tone::Formal => "Formal",
        Tone::Business => "Business",
    }
}
