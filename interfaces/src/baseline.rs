use anyhow::Result;

use crate::defs::Article;
use crate::defs::BatchDocument;
use crate::defs::EditorialModel;
use crate::defs::EditorialOutput;
use crate::defs::EditorialPick;

fn commentary_for(article: &Article) -> String {
    if article.excerpt.is_empty() {
        article.title.clone()
    } else {
        article.excerpt.clone()
    }
}

fn compose_text(batch: &BatchDocument) -> String {
    batch
        .articles
        .iter()
        .map(|article| format!("{} ({})", article.title, article.source))
        .collect::<Vec<String>>()
        .join("\n")
}

/// Selects every article and echoes its excerpt as commentary.
pub struct BaselineEditorialModel;

impl EditorialModel for BaselineEditorialModel {
    fn select(batch: &BatchDocument) -> Result<EditorialOutput> {
        let picks = batch
            .articles
            .iter()
            .enumerate()
            .map(|(index, article)| EditorialPick {
                index,
                selected: true,
                commentary: commentary_for(article),
            })
            .collect::<Vec<EditorialPick>>();
        Ok(EditorialOutput {
            picks,
            text: compose_text(batch),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::Category;

    #[test]
    fn selects_everything() -> Result<()> {
        let batch = BatchDocument::new(
            24,
            vec![
                Article::new("Bridge reopens after repairs", "", "KETV Omaha", Category::Local)
                    .with_excerpt("The bridge reopened Tuesday."),
                Article::new("Library extends weekend hours", "", "LISNews", Category::Libraries),
            ],
        );
        let output = BaselineEditorialModel::select(&batch)?;
        assert_eq!(output.selected_indices(), vec![0, 1]);
        assert_eq!(output.picks[0].commentary, "The bridge reopened Tuesday.");
        assert_eq!(output.picks[1].commentary, "Library extends weekend hours");
        assert!(output.text.contains("(KETV Omaha)"));
        Ok(())
    }
}
