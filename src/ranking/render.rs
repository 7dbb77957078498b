// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTML rendering of a ranking

use super::{format_percent, Ranking};

/// Render a ranking as the result card fragment.
///
/// `image_src` is either a data URI (upload path) or the original remote
/// URL (URL path). The caption names the predicted label with its
/// confidence; the description lists the remaining labels in ranked
/// order, each with its percentage.
pub fn classification_card(ranking: &Ranking, image_src: &str) -> String {
    let others = ranking
        .others()
        .map(|(label, prob)| format!("<b>{}</b> ({}%)", label, format_percent(*prob)))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"
<div class="ui container">
<div class="ui card">
  <div class="image">
    <img alt="Classified image" src="{image_src}" />
  </div>
  <div class="content">
    <a class="header">This is {label}</a>
    <div class="meta">
      <span class="date">I'm {confidence}% confident about that</span>
    </div>
    <div class="description">
      Other possibilities are less likely: {others}.
    </div>
  </div>
</div>
<div class="ui container">
<button class="ui button" onclick="history.go(-1)">Back</button>
</div>
</div>
"#,
        image_src = image_src,
        label = ranking.predicted_label,
        confidence = format_percent(ranking.confidence),
        others = others,
    )
}
