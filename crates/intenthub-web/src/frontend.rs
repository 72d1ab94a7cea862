//! Embedded dashboard page.
//!
//! Static HTML with inline CSS and a few lines of JavaScript that post to
//! the JSON API and print the raw response.

/// The dashboard served at `/`.
pub const DASHBOARD_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Enterprise RAG &amp; Workflow Hub</title>
<style>
body{font-family:Arial,sans-serif;margin:40px;color:#222}
.card{background:#f5f5f5;padding:20px;margin:10px 0;border-radius:8px}
.success{color:green}
.error{color:red}
input[type=text]{width:320px;padding:10px}
button{padding:10px 20px}
pre{background:#0d1117;color:#e4e4e4;padding:12px;border-radius:6px;overflow:auto;max-height:480px}
</style>
</head>
<body>
<h1>Enterprise RAG &amp; Workflow Automation Hub</h1>

<div class="card">
  <h3>System Status: <span id="status">checking...</span></h3>
  <p>Services: BigQuery, Cloud Storage</p>
  <p>Agents: Router, RAG</p>
</div>

<div class="card">
  <h3>Chat Interface</h3>
  <form id="process-form" action="/process" method="post">
    <input type="text" name="query" id="query"
           placeholder="Ask me to analyze data, manage documents, or create reports...">
    <button type="submit">Send</button>
  </form>
</div>

<div class="card">
  <h3>Example Queries</h3>
  <ul>
    <li>"Create sample data for demonstration"</li>
    <li>"Show me my datasets in BigQuery"</li>
    <li>"Analyze claims data and generate report"</li>
    <li>"Upload sample documents to storage"</li>
  </ul>
</div>

<div class="card">
  <h3>System Controls</h3>
  <p><a href="/status">System Status</a> | <a href="/api/demo">Run Demo</a> | <a href="/api/history">History</a></p>
</div>

<pre id="output" hidden></pre>

<script>
const output = document.getElementById('output');
function show(value, ok) {
  output.hidden = false;
  output.className = ok ? 'success' : 'error';
  output.textContent = JSON.stringify(value, null, 2);
}
document.getElementById('process-form').addEventListener('submit', async (event) => {
  event.preventDefault();
  const query = document.getElementById('query').value;
  const res = await fetch('/process', {
    method: 'POST',
    headers: {'Content-Type': 'application/json'},
    body: JSON.stringify({query}),
  });
  show(await res.json(), res.ok);
});
fetch('/status').then(r => r.json()).then(s => {
  document.getElementById('status').textContent = s.status;
}).catch(() => {
  document.getElementById('status').textContent = 'unreachable';
});
</script>
</body>
</html>
"##;
