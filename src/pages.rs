//! Inline HTML for the two pages. No template engine; pages are built the
//! same way the rest of the app builds JSON: as plain strings.

/// Minimal HTML escaping for interpolated filenames and messages.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Gallery page: image grid plus a chat panel. Clicking an image selects it;
/// the chat panel re-encodes the selection as a JPEG data-URI and posts it
/// with the query to `/chat_with_llm`.
pub fn gallery_page(images: &[String]) -> String {
    let mut grid = String::new();
    if images.is_empty() {
        grid.push_str("<p class=\"empty\">No images uploaded yet.</p>");
    } else {
        for name in images {
            let name = escape(name);
            grid.push_str(&format!(
                "<img class=\"thumb\" src=\"/uploads/{name}\" alt=\"{name}\" \
                 title=\"{name}\" onclick=\"selectImage(this)\">"
            ));
        }
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Image Gallery</title>
    <style>
        body {{ font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; margin: 0; background: #f4f5f7; color: #333; }}
        header {{ background: #4a5bdc; color: white; padding: 16px 24px; display: flex; justify-content: space-between; align-items: center; }}
        header a {{ color: white; font-weight: 600; text-decoration: none; }}
        main {{ display: flex; gap: 24px; padding: 24px; }}
        .grid {{ flex: 2; display: flex; flex-wrap: wrap; gap: 12px; align-content: flex-start; }}
        .thumb {{ width: 180px; height: 180px; object-fit: cover; border-radius: 8px; cursor: pointer; border: 3px solid transparent; }}
        .thumb.selected {{ border-color: #4a5bdc; }}
        .empty {{ color: #888; }}
        .chat {{ flex: 1; background: white; border-radius: 8px; padding: 16px; display: flex; flex-direction: column; max-height: 75vh; }}
        .chat h2 {{ margin-top: 0; font-size: 1.1em; }}
        #messages {{ flex: 1; overflow-y: auto; margin-bottom: 12px; }}
        .message {{ padding: 8px 12px; border-radius: 8px; margin-bottom: 8px; white-space: pre-wrap; }}
        .user-message {{ background: #e8ebff; }}
        .bot-message {{ background: #f0f0f0; }}
        .chat-row {{ display: flex; gap: 8px; }}
        #user-input {{ flex: 1; padding: 8px; border: 1px solid #ccc; border-radius: 6px; }}
        button {{ background: #4a5bdc; color: white; border: none; border-radius: 6px; padding: 8px 16px; cursor: pointer; }}
    </style>
</head>
<body>
    <header>
        <span>Image Gallery</span>
        <a href="/upload">Upload an image</a>
    </header>
    <main>
        <div class="grid">{grid}</div>
        <div class="chat">
            <h2>Ask about an image</h2>
            <div id="messages"></div>
            <div class="chat-row">
                <input id="user-input" placeholder="Select an image, then ask...">
                <button id="send-button">Send</button>
            </div>
        </div>
    </main>
    <script>
        let selected = null;

        function selectImage(img) {{
            document.querySelectorAll('.thumb').forEach(t => t.classList.remove('selected'));
            img.classList.add('selected');
            selected = img;
        }}

        function addMessage(text, className) {{
            const messages = document.getElementById('messages');
            const div = document.createElement('div');
            div.classList.add('message', ...className.split(' '));
            div.textContent = text;
            messages.appendChild(div);
            messages.scrollTop = messages.scrollHeight;
            return div;
        }}

        function snapshot(img) {{
            const canvas = document.createElement('canvas');
            canvas.width = img.naturalWidth;
            canvas.height = img.naturalHeight;
            canvas.getContext('2d').drawImage(img, 0, 0);
            return canvas.toDataURL('image/jpeg', 0.8);
        }}

        async function sendMessage() {{
            const input = document.getElementById('user-input');
            const query = input.value.trim();
            if (query === '') return;
            if (!selected) {{
                addMessage('Select an image first.', 'bot-message');
                return;
            }}
            addMessage(query, 'user-message');
            input.value = '';
            const typing = addMessage('...', 'bot-message');
            try {{
                const response = await fetch('/chat_with_llm', {{
                    method: 'POST',
                    headers: {{ 'Content-Type': 'application/json' }},
                    body: JSON.stringify({{ query: query, image: snapshot(selected) }}),
                }});
                const data = await response.json();
                typing.remove();
                if (!response.ok) {{
                    addMessage('Error: ' + (data.error || response.statusText), 'bot-message');
                }} else {{
                    addMessage(data.response, 'bot-message');
                }}
            }} catch (err) {{
                typing.remove();
                addMessage('Error: could not reach the server.', 'bot-message');
            }}
        }}

        document.getElementById('send-button').addEventListener('click', sendMessage);
        document.getElementById('user-input').addEventListener('keypress', e => {{
            if (e.key === 'Enter') sendMessage();
        }});
    </script>
</body>
</html>
"#
    )
}

/// Upload form, with an optional flash-style message from a failed attempt.
pub fn upload_page(message: Option<&str>) -> String {
    let flash = match message {
        Some(msg) => format!("<p class=\"flash\">{}</p>", escape(msg)),
        None => String::new(),
    };
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Upload Image</title>
    <style>
        body {{ font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; background: #f4f5f7; color: #333; display: flex; justify-content: center; padding-top: 10vh; }}
        .card {{ background: white; border-radius: 8px; padding: 32px; width: 420px; }}
        h1 {{ margin-top: 0; font-size: 1.3em; }}
        .flash {{ background: #fee; border: 1px solid #fcc; color: #c33; padding: 10px; border-radius: 6px; }}
        .hint {{ color: #888; font-size: 0.9em; }}
        input[type=file] {{ margin: 16px 0; display: block; }}
        button {{ background: #4a5bdc; color: white; border: none; border-radius: 6px; padding: 8px 16px; cursor: pointer; }}
        a {{ color: #4a5bdc; }}
    </style>
</head>
<body>
    <div class="card">
        <h1>Upload an image</h1>
        {flash}
        <form method="post" enctype="multipart/form-data">
            <input type="file" name="file" accept="image/*">
            <p class="hint">Allowed types: png, jpg, jpeg, gif</p>
            <button type="submit">Upload</button>
        </form>
        <p><a href="/">Back to gallery</a></p>
    </div>
</body>
</html>
"#
    )
}
