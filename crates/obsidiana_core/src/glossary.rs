//! Gynecological and energetic glossary.
//!
//! Pairs the medical definition of each condition with the obsidian
//! perspective on it. Search is accent-insensitive so "colicos" finds
//! "cólicos".

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

#[derive(Debug, Clone, Copy)]
pub struct GlossaryTerm {
    pub term: &'static str,
    pub definition: &'static str,
    /// How obsidian egg practice relates to the condition.
    pub perspective: &'static str,
    pub wiki_url: &'static str,
    pub keywords: &'static [&'static str],
}

pub const GLOSSARY: [GlossaryTerm; 8] = [
    GlossaryTerm {
        term: "Adenomyosis",
        definition: "Tissue that normally lines the uterus (the endometrium) grows into the muscular wall of the uterus.",
        perspective: "Associated with deep healing of the womb and the release of 'memories' or stagnant energy held in the uterine muscle. Obsidian works on shadows and chronic pain.",
        wiki_url: "https://en.wikipedia.org/wiki/Adenomyosis",
        keywords: &["pain", "bleeding", "endometrium", "muscular wall", "cramps"],
    },
    GlossaryTerm {
        term: "Secondary Amenorrhea",
        definition: "Absence of the menstrual period for three or more consecutive cycles.",
        perspective: "Helps a woman 'remember' her natural cycle, reactivating the energy of the reproductive center. Linked to the healing of deep emotional blockages.",
        wiki_url: "https://en.wikipedia.org/wiki/Amenorrhea",
        keywords: &["absence", "period", "menstruation", "cycle", "blockage"],
    },
    GlossaryTerm {
        term: "Cervical Dysplasia (CIN)",
        definition: "Abnormal cells on the cervix, often caused by HPV (human papillomavirus), which can be precancerous.",
        perspective: "Usually symptomless, detected by a Pap smear. Obsidian acts as a strong protector and cleanser of negative and toxic energy, used to support cellular regeneration.",
        wiki_url: "https://en.wikipedia.org/wiki/Cervical_intraepithelial_neoplasia",
        keywords: &["HPV", "virus", "papilloma", "cancer", "cervix", "pap smear"],
    },
    GlossaryTerm {
        term: "Dyspareunia",
        definition: "Persistent or recurrent pain in the genital area before, during, or after intercourse.",
        perspective: "By helping relax the pelvic floor and raising body awareness, it can ease the release of the muscular and emotional tension bound to the pain.",
        wiki_url: "https://en.wikipedia.org/wiki/Dyspareunia",
        keywords: &["sexual pain", "intercourse", "sex", "penetration", "tension"],
    },
    GlossaryTerm {
        term: "Endometriosis",
        definition: "Growth of endometrium-like tissue outside the uterus.",
        perspective: "Obsidian practice is associated with releasing pain and traumatic memories, helping to 'uproot' the emotional cause of the inflammation.",
        wiki_url: "https://en.wikipedia.org/wiki/Endometriosis",
        keywords: &["inflammation", "tissue", "outside the uterus", "pelvic pain", "trauma"],
    },
    GlossaryTerm {
        term: "Uterine Fibroid",
        definition: "Benign tumors that grow in the wall of the uterus.",
        perspective: "Obsidian is associated with dissolving emotional and physical 'knots'. It is used to help shrink these masses or keep their growth at bay.",
        wiki_url: "https://en.wikipedia.org/wiki/Uterine_fibroid",
        keywords: &["fibroids", "tumors", "benign", "lumps", "masses", "knots"],
    },
    GlossaryTerm {
        term: "PCOS (Polycystic Ovary Syndrome)",
        definition: "A common hormonal disorder marked by elevated androgen levels and cysts on the ovaries.",
        perspective: "Obsidian can help a woman reconnect with her cycle and accept her creative power, balancing hormonal energy.",
        wiki_url: "https://en.wikipedia.org/wiki/Polycystic_ovary_syndrome",
        keywords: &["cysts", "hormones", "acne", "body hair", "irregular", "infertility"],
    },
    GlossaryTerm {
        term: "Vaginismus",
        definition: "Involuntary contraction of the pelvic floor muscles around the vagina, preventing penetration.",
        perspective: "Tied to unconscious fear. The egg helps regain control and progressively relax the pelvic floor muscles, breaking the fear-contraction loop.",
        wiki_url: "https://en.wikipedia.org/wiki/Vaginismus",
        keywords: &["contraction", "fear", "penetration", "closed", "pain", "impossible"],
    },
];

/// Strip accents and case: NFD, drop combining marks, lowercase.
fn fold(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Terms matching the query in name, definition, perspective, or keywords.
/// An empty query matches everything.
pub fn search(query: &str) -> Vec<&'static GlossaryTerm> {
    let needle = fold(query.trim());
    GLOSSARY
        .iter()
        .filter(|entry| {
            fold(entry.term).contains(&needle)
                || fold(entry.definition).contains(&needle)
                || fold(entry.perspective).contains(&needle)
                || entry
                    .keywords
                    .iter()
                    .any(|keyword| fold(keyword).contains(&needle))
        })
        .collect()
}
