//! # 一覧ページ
//!
//! `ObjectSummary` の一覧からHTMLページを生成する純粋な射影。
//! ページ内スクリプトは /get-upload-url, /get-download-url を相対パスで呼び出し、
//! ファイル本体はストレージと直接やり取りする。

use std::fmt::Write;

use filegate_types::ObjectSummary;

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>File Manager</title>
    <style>
        body { font-family: sans-serif; margin: 20px; }
        .upload-section { margin-bottom: 20px; padding: 10px; border: 1px solid #ccc; }
        ul { list-style-type: none; padding: 0; }
        li { margin-bottom: 10px; padding: 5px; border: 1px solid #eee; }
        button { margin-left: 10px; }
    </style>
</head>
<body>
    <h1>File Manager</h1>
    <div class="upload-section">
        <h2>Upload File</h2>
        <input type="file" id="fileInput" />
        <button onclick="uploadFile()">Upload</button>
        <p id="uploadStatus"></p>
    </div>
    <h2>Uploaded Files</h2>
    <ul id="fileList">
"#;

const PAGE_TAIL: &str = r#"    </ul>
    <script>
        async function requestUrl(path, payload) {
            const response = await fetch(path, {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify(payload)
            });
            const data = await response.json();
            if (!response.ok) throw new Error(data.message || data.error || 'Request failed');
            return data;
        }

        async function uploadFile() {
            const file = document.getElementById('fileInput').files[0];
            const status = document.getElementById('uploadStatus');
            if (!file) {
                status.textContent = 'Please select a file first.';
                return;
            }
            const contentType = file.type || 'application/octet-stream';
            status.textContent = 'Getting upload URL...';
            try {
                const data = await requestUrl('get-upload-url', { fileName: file.name, contentType });
                status.textContent = 'Uploading...';
                const put = await fetch(data.uploadUrl, { method: 'PUT', body: file, headers: { 'Content-Type': contentType } });
                if (!put.ok) throw new Error('Storage responded with ' + put.status);
                status.textContent = 'Upload successful! Refreshing list...';
                location.reload();
            } catch (err) {
                console.error('Upload error:', err);
                status.textContent = 'Upload failed: ' + err.message;
            }
        }

        async function downloadFile(button) {
            try {
                const data = await requestUrl('get-download-url', { fileKey: button.dataset.key });
                window.open(data.downloadUrl, '_blank');
            } catch (err) {
                console.error('Download error:', err);
                alert('Failed to get download link: ' + err.message);
            }
        }
    </script>
</body>
</html>
"#;

/// 一覧ページを生成する。
pub fn render_listing(objects: &[ObjectSummary]) -> String {
    let mut html = String::with_capacity(PAGE_HEAD.len() + PAGE_TAIL.len() + objects.len() * 128);
    html.push_str(PAGE_HEAD);

    if objects.is_empty() {
        html.push_str("        <li>No files uploaded yet.</li>\n");
    }

    for object in objects {
        let key = escape_html(&object.key);
        // Stringへの書き込みは失敗しない
        let _ = writeln!(
            html,
            "        <li>{key} ({size} KB) <button data-key=\"{key}\" onclick=\"downloadFile(this)\">Download</button></li>",
            size = format_kib(object.size_bytes),
        );
    }

    html.push_str(PAGE_TAIL);
    html
}

/// バイト数をKB（1024バイト単位、小数点以下2桁）で表記する。
pub fn format_kib(size_bytes: u64) -> String {
    format!("{:.2}", size_bytes as f64 / 1024.0)
}

/// HTML本文・属性値として安全な形にエスケープする。
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
