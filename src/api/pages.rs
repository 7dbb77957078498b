// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Static page layout and the landing form

/// Wrap a body fragment in the shared page layout.
pub fn layout(body: &str) -> String {
    format!(
        r#"<html>
<head>
    <link rel="stylesheet" type="text/css" href="https://cdnjs.cloudflare.com/ajax/libs/semantic-ui/2.4.1/semantic.min.css">
</head>
<body style="margin: 10px">
<h1 class="ui center aligned header">Wild boar or deer?</h1>
{}
</body>
</html>
"#,
        body
    )
}

/// Landing page: an upload form and a URL form.
pub fn landing_page() -> String {
    layout(
        r#"
<h2 class="ui center aligned header">Upload a photo taken in forest</h2>

<div class="ui container">
        <form action="/upload" method="post" enctype="multipart/form-data" class="ui form">
            <div class="field">
                <label>Select image to upload:</label>
                <input type="file" name="file">
            </div>
            <input type="submit" value="Detect wild animals" class="ui button primary"/>
        </form>
</div>

<h2 class="ui center aligned header">...or give me a URL of such image</h2>
<div class="ui container">
        <form action="/classify-url" method="get" class="ui form">
            <div class="field">
                <label>Image URL:</label>
                <input type="url" name="url">
            </div>
            <input type="submit" value="Detect wild animals" class="ui button primary"/>
        </form>
</div>
"#,
    )
}
