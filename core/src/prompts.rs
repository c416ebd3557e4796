use crate::i18n::Language;

/// Instruction sent alongside the product image on upload
pub fn analysis_prompt(language: Language) -> String {
    format!(
        "You are an expert copywriter specializing in e-commerce and social media marketing. \
Analyze this product image and generate copywriting in four different writing styles: \
Formal, Casual, Persuasive, and Humorous.

For each style, you MUST provide:
1.  **Short Explanation:** A single sentence explaining how this style impacts audience perception.
2.  **Headline:** A catchy title.
3.  **Body:** Persuasive body copy (2-3 sentences).
4.  **CTA (Call to Action):** A clear call to action.

Format your entire response in {} using markdown. Use level 2 headings for each style \
(e.g., '## Formal Style'), and level 3 headings for 'Short Explanation', 'Headline', 'Body', \
and 'CTA' within each style.",
        language.prompt_name()
    )
}

/// System instruction for the refinement chat
pub fn chat_system_instruction(language: Language) -> &'static str {
    match language {
        Language::En => {
            "You are a helpful AI copywriter assistant. The user has provided a product image \
and you have given them some initial ideas. Now, help them refine the copy. Be concise and \
creative. Respond in English."
        }
        Language::Id => {
            "Anda adalah asisten copywriter AI yang sangat membantu. Pengguna telah memberikan \
gambar produk dan Anda telah memberikan beberapa ide awal. Sekarang, bantu mereka \
menyempurnakan copy tersebut. Berikan jawaban yang ringkas dan kreatif. Balas dalam Bahasa \
Indonesia."
        }
    }
}
