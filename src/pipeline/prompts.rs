use crate::models::{VariationOptions, VARIATION_COUNT};

const ANALYSIS_INSTRUCTIONS: &str = "Analyze this image in detail. Describe:
1. Main subject and composition
2. Color palette and lighting
3. Style and mood
4. Key visual elements";

const PRESERVE_COLORS_DIRECTIVE: &str =
    "Focus on preserving the color scheme in variations.";
const PRESERVE_COMPOSITION_DIRECTIVE: &str =
    "Focus on preserving the composition structure in variations.";

/// Instruction sent alongside the image to the analysis model.
pub fn analysis_prompt(options: VariationOptions) -> String {
    let mut sections = vec![ANALYSIS_INSTRUCTIONS.to_string()];

    let mut directives = Vec::new();
    if options.preserve_colors {
        directives.push(PRESERVE_COLORS_DIRECTIVE);
    }
    if options.preserve_composition {
        directives.push(PRESERVE_COMPOSITION_DIRECTIVE);
    }
    if !directives.is_empty() {
        sections.push(directives.join("\n"));
    }

    sections.push(format!(
        "Provide a detailed description suitable for generating {} distinct variations of this image.",
        VARIATION_COUNT
    ));
    sections.join("\n\n")
}

/// The four generation prompts, each pairing the analysis with a different
/// stylistic direction.
pub fn variation_prompts(analysis: &str, options: VariationOptions) -> [String; VARIATION_COUNT] {
    let analysis = analysis.trim();
    let colors = options.preserve_colors;
    let composition = options.preserve_composition;

    [
        format!(
            "{}. Create a variation with {} and {}.",
            analysis,
            pick(colors, "same colors", "different colors"),
            pick(composition, "similar composition", "new composition"),
        ),
        format!(
            "{}. Create an artistic interpretation with {}.",
            analysis,
            pick(colors, "original color palette", "creative color changes"),
        ),
        format!(
            "{}. Generate a fresh take while {}.",
            analysis,
            pick(composition, "maintaining the layout", "exploring new arrangements"),
        ),
        format!(
            "{}. Produce a unique version {}.",
            analysis,
            pick(colors, "preserving color harmony", "with bold color shifts"),
        ),
    ]
}

fn pick(flag: bool, when_set: &'static str, otherwise: &'static str) -> &'static str {
    if flag {
        when_set
    } else {
        otherwise
    }
}
