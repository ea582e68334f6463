//! Prompt composition for dialogue generation.
//!
//! Pure and deterministic: the same options always produce the same
//! instruction string. Cosmetic option keys (locale, dialogue type, tone,
//! length) resolve against fixed tables with a silent fallback, so an
//! unknown key can never fail a request.

use std::fmt::Write;

use dialogue_protocol::Character;

/// Inputs to [`build_prompt`]. Defaults for absent options are applied
/// here, not by the caller.
#[derive(Debug, Clone)]
pub struct PromptOptions<'a> {
    pub premise: &'a str,
    pub locale: &'a str,
    pub characters: &'a [Character],
    pub dialogue_type: Option<&'a str>,
    pub tone: Option<&'a str>,
    pub length: Option<&'a str>,
    pub setting: Option<&'a str>,
    pub include_narration: bool,
}

struct LanguageName {
    native: &'static str,
    english: &'static str,
}

fn language_name(locale: &str) -> LanguageName {
    let (native, english) = match locale {
        "en" => ("English", "English"),
        "zh" => ("中文", "Chinese"),
        "de" => ("Deutsch", "German"),
        "ko" => ("한국어", "Korean"),
        "ja" => ("日本語", "Japanese"),
        "ru" => ("Русский", "Russian"),
        "es" => ("Español", "Spanish"),
        "fr" => ("Français", "French"),
        "pt" => ("Português", "Portuguese"),
        "it" => ("Italiano", "Italian"),
        "ar" => ("العربية", "Arabic"),
        "hi" => ("हिन्दी", "Hindi"),
        _ => ("English", "English"),
    };
    LanguageName { native, english }
}

struct LocalizedDescription {
    en: &'static str,
    zh: &'static str,
}

impl LocalizedDescription {
    fn for_locale(&self, locale: &str) -> &'static str {
        if locale == "zh" {
            self.zh
        } else {
            self.en
        }
    }
}

fn dialogue_type_description(key: &str) -> LocalizedDescription {
    let (en, zh) = match key {
        "argument" => (
            "A heated argument or debate with conflicting viewpoints",
            "激烈的争论或辩论，观点冲突",
        ),
        "interview" => ("A formal or informal interview format", "正式或非正式的采访形式"),
        "negotiation" => ("A negotiation scene with give and take", "有来有往的谈判场景"),
        "confession" => ("An emotional confession or revelation", "情感告白或揭示真相"),
        "comedy" => ("A comedic exchange with humor and wit", "幽默诙谐的喜剧对话"),
        "dramatic" => (
            "A dramatic, intense dialogue with high stakes",
            "戏剧性的、紧张的高风险对话",
        ),
        "philosophical" => ("A deep, philosophical discussion", "深刻的哲学讨论"),
        // "conversation" and anything unrecognized
        _ => (
            "A natural, flowing conversation between characters",
            "角色之间自然流畅的对话",
        ),
    };
    LocalizedDescription { en, zh }
}

fn tone_description(key: &str) -> LocalizedDescription {
    let (en, zh) = match key {
        "formal" => ("Formal and professional", "正式专业"),
        "emotional" => ("Emotional and heartfelt", "情感真挚"),
        "humorous" => ("Humorous and witty", "幽默风趣"),
        "tense" => ("Tense and suspenseful", "紧张悬疑"),
        "romantic" => ("Romantic and tender", "浪漫温柔"),
        "mysterious" => ("Mysterious and intriguing", "神秘引人入胜"),
        // "casual" and anything unrecognized
        _ => ("Casual and relaxed", "随意轻松"),
    };
    LocalizedDescription { en, zh }
}

struct LengthBand {
    exchanges: &'static str,
    description: &'static str,
}

fn length_band(key: &str) -> LengthBand {
    let (exchanges, description) = match key {
        "short" => ("5-10", "brief exchange"),
        "long" => ("30-50", "extended dialogue"),
        // "medium" and anything unrecognized
        _ => ("15-25", "moderate conversation"),
    };
    LengthBand {
        exchanges,
        description,
    }
}

/// Compose the upstream instruction block for a dialogue request.
///
/// Every non-empty caller-supplied character and setting appears verbatim
/// in the output; the user premise is appended untouched.
pub fn build_prompt(opts: &PromptOptions<'_>) -> String {
    let lang = language_name(opts.locale);
    let type_desc =
        dialogue_type_description(opts.dialogue_type.unwrap_or("conversation"));
    let tone_desc = tone_description(opts.tone.unwrap_or("casual"));
    let band = length_band(opts.length.unwrap_or("medium"));

    let mut character_section = String::new();
    if !opts.characters.is_empty() {
        character_section.push_str("\n## Characters\n");
        for (i, c) in opts.characters.iter().enumerate() {
            let _ = write!(character_section, "Character {}: {}", i + 1, c.name);
            if let Some(personality) = c.personality.as_deref() {
                let _ = write!(character_section, " - Personality: {personality}");
            }
            if let Some(role) = c.role.as_deref() {
                let _ = write!(character_section, " - Role: {role}");
            }
            character_section.push('\n');
        }
    }

    let mut setting_section = String::new();
    if let Some(setting) = opts.setting.filter(|s| !s.is_empty()) {
        let _ = write!(setting_section, "\n## Setting\n{setting}\n");
    }

    let narration_instruction = if opts.include_narration {
        "Include brief narrative descriptions between dialogue lines to set the scene, describe actions, and convey emotions."
    } else {
        "Focus purely on dialogue without narrative descriptions."
    };

    format!(
        "You are an expert dialogue writer and screenwriter. Your task is to create compelling, realistic, and engaging dialogue based on the user's scenario.\n\
        \n\
        ## Output Requirements\n\
        - Write the dialogue in {english} ({native})\n\
        - Create a {type_desc}\n\
        - Maintain a {tone_desc} tone throughout\n\
        - Generate approximately {exchanges} dialogue exchanges ({band_desc})\n\
        - {narration_instruction}\n\
        - Each character should have a distinct voice and speaking style\n\
        - The dialogue should feel natural and authentic\n\
        - Include subtext and emotional undertones where appropriate\n\
        {character_section}{setting_section}\n\
        ## Formatting Guidelines\n\
        - Use character names followed by a colon for each line of dialogue\n\
        - Example format:\n\
        \x20 **Character Name:** \"Dialogue line here.\"\n\
        \n\
        \x20 *Brief narrative description if narration is enabled.*\n\
        \n\
        \x20 **Another Character:** \"Response here.\"\n\
        \n\
        - Make the dialogue flow naturally with realistic interruptions, pauses, and reactions\n\
        - Avoid exposition dumps - reveal information organically through conversation\n\
        \n\
        ## Scenario\n\
        {premise}\n\
        \n\
        Now write the dialogue based on the above scenario and requirements.",
        english = lang.english,
        native = lang.native,
        type_desc = type_desc.for_locale(opts.locale),
        tone_desc = tone_desc.for_locale(opts.locale),
        exchanges = band.exchanges,
        band_desc = band.description,
        narration_instruction = narration_instruction,
        character_section = character_section,
        setting_section = setting_section,
        premise = opts.premise,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_options(premise: &str) -> PromptOptions<'_> {
        PromptOptions {
            premise,
            locale: "en",
            characters: &[],
            dialogue_type: None,
            tone: None,
            length: None,
            setting: None,
            include_narration: true,
        }
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let opts = base_options("Two rivals meet in the rain");
        assert_eq!(build_prompt(&opts), build_prompt(&opts));
    }

    #[test]
    fn test_premise_appears_verbatim() {
        let opts = base_options("Two rivals meet in the rain");
        let prompt = build_prompt(&opts);
        assert!(prompt.contains("## Scenario\nTwo rivals meet in the rain\n"));
    }

    #[test]
    fn test_unknown_keys_fall_back_to_defaults() {
        let mut opts = base_options("p");
        opts.locale = "xx-unknown";
        opts.dialogue_type = Some("no-such-type");
        opts.tone = Some("no-such-tone");
        opts.length = Some("no-such-length");
        let prompt = build_prompt(&opts);
        assert!(prompt.contains("Write the dialogue in English (English)"));
        assert!(prompt.contains("A natural, flowing conversation between characters"));
        assert!(prompt.contains("Casual and relaxed"));
        assert!(prompt.contains("approximately 15-25 dialogue exchanges (moderate conversation)"));
    }

    #[test]
    fn test_chinese_locale_uses_chinese_descriptions() {
        let mut opts = base_options("p");
        opts.locale = "zh";
        opts.dialogue_type = Some("argument");
        opts.tone = Some("tense");
        let prompt = build_prompt(&opts);
        assert!(prompt.contains("Write the dialogue in Chinese (中文)"));
        assert!(prompt.contains("激烈的争论或辩论，观点冲突"));
        assert!(prompt.contains("紧张悬疑"));
    }

    #[test]
    fn test_characters_are_listed_in_order_with_details() {
        let characters = vec![
            Character {
                name: "Mara".to_string(),
                personality: Some("guarded".to_string()),
                role: Some("detective".to_string()),
            },
            Character::new("Theo"),
        ];
        let mut opts = base_options("p");
        opts.characters = &characters;
        let prompt = build_prompt(&opts);
        let mara = prompt
            .find("Character 1: Mara - Personality: guarded - Role: detective")
            .expect("first character listed");
        let theo = prompt.find("Character 2: Theo").expect("second character listed");
        assert!(mara < theo);
    }

    #[test]
    fn test_setting_block_appears_verbatim() {
        let mut opts = base_options("p");
        opts.setting = Some("A rain-soaked rooftop at midnight");
        let prompt = build_prompt(&opts);
        assert!(prompt.contains("## Setting\nA rain-soaked rooftop at midnight\n"));
    }

    #[test]
    fn test_empty_setting_is_omitted() {
        let mut opts = base_options("p");
        opts.setting = Some("");
        assert!(!build_prompt(&opts).contains("## Setting"));
    }

    #[test]
    fn test_narration_toggle() {
        let mut opts = base_options("p");
        let with = build_prompt(&opts);
        assert!(with.contains("Include brief narrative descriptions"));
        opts.include_narration = false;
        let without = build_prompt(&opts);
        assert!(without.contains("Focus purely on dialogue without narrative descriptions."));
    }

    #[test]
    fn test_length_bands() {
        let mut opts = base_options("p");
        opts.length = Some("short");
        assert!(build_prompt(&opts).contains("approximately 5-10 dialogue exchanges"));
        opts.length = Some("long");
        assert!(build_prompt(&opts).contains("approximately 30-50 dialogue exchanges"));
    }
}
