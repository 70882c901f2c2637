//! ui::page
//!
//! The single-page browser shell served at `/`.
//!
//! The page loads HTML fragments from `/ui/*` and posts JSON to `/api/*`.
//! Its script keeps the same client-side state as the Rust types in this
//! module's siblings: a pagination cursor, a selection set and one
//! control state per button. Client-side guards (repository path, commit
//! message, branch name, selection) run before any request is sent.

use super::html::escape;
use super::pagination::SCROLL_THRESHOLD_PX;

/// Toasts dismiss themselves after this many milliseconds.
pub const TOAST_MS: u32 = 3000;

const TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>githandle</title>
<style>
:root { --bg: #1e1f22; --panel: #2b2d31; --text: #e6e6e6; --muted: #9aa0a6; --accent: #4f8cff; --ok: #3fb950; --danger: #f85149; --border: #3c3f44; }
* { box-sizing: border-box; }
body { margin: 0; font: 14px/1.4 system-ui, sans-serif; background: var(--bg); color: var(--text); }
header { display: flex; gap: 8px; padding: 12px 16px; border-bottom: 1px solid var(--border); }
header input { flex: 1; }
main { display: grid; grid-template-columns: 1fr 1fr; gap: 16px; padding: 16px; }
section { background: var(--panel); border: 1px solid var(--border); border-radius: 6px; padding: 12px; }
h2 { margin: 0 0 8px; font-size: 15px; }
h3 { margin: 8px 0 4px; font-size: 13px; color: var(--muted); }
input, select, button { font: inherit; color: var(--text); background: var(--bg); border: 1px solid var(--border); border-radius: 4px; padding: 6px 8px; }
button { cursor: pointer; }
button:disabled, select:disabled { opacity: .5; cursor: progress; }
button.danger { border-color: var(--danger); }
.row { display: flex; gap: 8px; margin-top: 8px; }
.row > input { flex: 1; }
.file-item { padding: 3px 6px; border-radius: 4px; }
.file-item.empty { color: var(--muted); }
.file-item.modified, .file-item.untracked { cursor: pointer; }
.file-item.selected { background: rgba(79,140,255,.25); }
.file-item .checkbox { display: inline-block; width: 10px; height: 10px; margin-right: 6px; border: 1px solid var(--muted); }
.file-item.selected .checkbox { background: var(--accent); }
#commitList { max-height: 60vh; overflow-y: auto; }
.commit-item { border-bottom: 1px solid var(--border); padding: 6px 0; }
.commit-item.loading { opacity: .5; }
.commit-header { display: flex; justify-content: space-between; gap: 8px; }
.commit-info { color: var(--muted); font-size: 12px; display: flex; gap: 12px; }
.commit-hash { font-family: monospace; }
.error-message { color: var(--danger); padding: 6px 0; }
#toasts { position: fixed; top: 16px; right: 16px; display: flex; flex-direction: column; gap: 8px; z-index: 10; }
.toast { background: var(--panel); border: 1px solid var(--border); border-left: 4px solid var(--ok); padding: 10px 16px; min-width: 280px; max-width: 480px; white-space: pre-wrap; }
.toast.error { border-left-color: var(--danger); }
#more { color: var(--muted); text-align: center; padding: 6px; }
</style>
</head>
<body>
<header>
  <input id="repoPath" placeholder="Repository path" value="__REPO_PATH__" aria-label="Repository path">
  <button id="refresh">Refresh</button>
</header>
<main>
  <section>
    <h2>Status</h2>
    <div id="statusContent"></div>
    <div class="row">
      <button id="stageSelected">Stage Selected</button>
      <button id="stageAll">Stage All</button>
    </div>
    <div class="row">
      <input id="commitMessage" placeholder="Commit message">
      <button id="commit">Commit</button>
    </div>
    <div class="row">
      <button id="push">Push</button>
      <button id="pull">Pull</button>
    </div>
    <h2 style="margin-top:16px">Branches</h2>
    <div class="row">
      <input id="newBranchName" placeholder="New branch name">
      <button id="createBranch">Create</button>
    </div>
    <div class="row">
      <select id="branchSelect"></select>
      <button id="switchBranch">Switch</button>
      <button id="mergeBranch">Merge</button>
    </div>
    <h2 style="margin-top:16px">Git Flow</h2>
    <div class="row">
      <button id="flowInit">Initialize Git Flow</button>
    </div>
    <div class="row">
      <select id="flowKind">
        <option value="feature">Feature</option>
        <option value="release">Release</option>
        <option value="hotfix">Hotfix</option>
      </select>
      <input id="flowName" placeholder="name (a-z, 0-9, -)">
      <input id="flowVersion" placeholder="version (1.0.0)">
      <button id="flowStart">Start</button>
    </div>
  </section>
  <section>
    <h2>History</h2>
    <div id="commitList"></div>
    <div id="more"></div>
  </section>
</main>
<div id="toasts" aria-live="polite"></div>
<script>
"use strict";
const PAGE_SIZE = __PAGE_SIZE__;
const SCROLL_THRESHOLD_PX = __SCROLL_THRESHOLD__;
const TOAST_MS = __TOAST_MS__;
const $ = (id) => document.getElementById(id);

// Pagination cursor: explicit state, never more than one load in flight.
const pager = {
  pageSize: PAGE_SIZE, nextSkip: 0, hasMore: true, loading: false,
  begin() {
    if (this.loading || !this.hasMore) return null;
    this.loading = true;
    return { skip: this.nextSkip, count: this.pageSize };
  },
  finish(received) { this.loading = false; this.nextSkip += received; this.hasMore = received === this.pageSize; },
  fail() { this.loading = false; this.hasMore = false; },
  reset() { this.nextSkip = 0; this.hasMore = true; this.loading = false; },
};

// Ordered selection of stageable paths.
const selection = {
  paths: [],
  toggle(path) {
    const i = this.paths.indexOf(path);
    if (i >= 0) { this.paths.splice(i, 1); return false; }
    this.paths.push(path); return true;
  },
  retain(available) { this.paths = this.paths.filter((p) => available.includes(p)); },
  clear() { this.paths = []; },
};

function toast(message, kind) {
  const el = document.createElement("div");
  el.className = "toast" + (kind === "error" ? " error" : "");
  el.textContent = message;
  $("toasts").appendChild(el);
  setTimeout(() => el.remove(), TOAST_MS);
}

function repoPath() {
  const value = $("repoPath").value.trim();
  if (!value) { toast("Please enter a repository path", "error"); return null; }
  return value;
}

async function api(url, body) {
  const init = body === undefined ? {} : {
    method: "POST", headers: { "Content-Type": "application/json" }, body: JSON.stringify(body),
  };
  const res = await fetch(url, init);
  const data = await res.json().catch(() => ({}));
  if (!res.ok) throw new Error(data.error || ("request failed: " + res.status));
  return data;
}

async function fragment(path, params) {
  const res = await fetch(path + "?" + new URLSearchParams(params));
  const text = await res.text();
  if (!res.ok) throw new Error(text.replace(/<[^>]*>/g, "") || ("request failed: " + res.status));
  return text;
}

// Control state per button: idle -> confirming -> submitting -> success|error -> idle.
async function runControl(control, { confirmMessage, request, after }) {
  if (control.disabled) return;
  if (confirmMessage && !window.confirm(confirmMessage)) return;
  control.disabled = true;
  try {
    const data = await request();
    toast((data && data.message) || "Done", "success");
    if (after) await after();
  } catch (err) {
    toast(err.message, "error");
  } finally {
    control.disabled = false;
  }
}

async function refreshStatus() {
  const repo = repoPath();
  if (!repo) return;
  try {
    $("statusContent").innerHTML = await fragment("/ui/status", { repoPath: repo });
    const available = [...document.querySelectorAll("#statusContent [data-file]")].map((el) => el.dataset.file);
    selection.retain(available);
    document.querySelectorAll("#statusContent [data-file]").forEach((el) => {
      const on = selection.paths.includes(el.dataset.file);
      el.classList.toggle("selected", on);
      el.setAttribute("aria-checked", String(on));
    });
    $("branchSelect").innerHTML = await fragment("/ui/branches", { repoPath: repo });
  } catch (err) {
    $("statusContent").innerHTML = "";
    toast(err.message, "error");
  }
}

async function loadMoreCommits() {
  const repo = $("repoPath").value.trim();
  if (!repo) return;
  const req = pager.begin();
  if (!req) return;
  $("more").textContent = "Loading…";
  try {
    const html = await fragment("/ui/commits", { repoPath: repo, skip: req.skip, count: req.count });
    const holder = document.createElement("div");
    holder.innerHTML = html;
    const items = holder.querySelectorAll(".commit-item");
    items.forEach((item) => $("commitList").appendChild(item));
    pager.finish(items.length);
    $("more").textContent = pager.hasMore ? "" : "End of history";
  } catch (err) {
    pager.fail();
    $("more").textContent = "";
    $("commitList").insertAdjacentHTML("beforeend", '<div class="error-message"></div>');
    $("commitList").lastElementChild.textContent = "Failed to load commits: " + err.message;
  }
}

async function reloadCommits() {
  pager.reset();
  $("commitList").innerHTML = "";
  await loadMoreCommits();
}

async function refreshAll() {
  await refreshStatus();
  await reloadCommits();
}

$("refresh").addEventListener("click", refreshAll);
$("repoPath").addEventListener("keydown", (e) => { if (e.key === "Enter") refreshAll(); });

$("commitList").addEventListener("scroll", () => {
  const el = $("commitList");
  if (el.scrollTop + el.clientHeight + SCROLL_THRESHOLD_PX >= el.scrollHeight) loadMoreCommits();
});

$("statusContent").addEventListener("click", (e) => {
  const item = e.target.closest("[data-file]");
  if (!item) return;
  const on = selection.toggle(item.dataset.file);
  item.classList.toggle("selected", on);
  item.setAttribute("aria-checked", String(on));
});

$("stageSelected").addEventListener("click", (e) => {
  const repo = repoPath();
  if (!repo) return;
  if (selection.paths.length === 0) { toast("Please select files to stage", "error"); return; }
  const files = [...selection.paths];
  runControl(e.currentTarget, {
    request: () => api("/api/stage", { repoPath: repo, files }),
    after: async () => { selection.clear(); await refreshStatus(); },
  });
});

$("stageAll").addEventListener("click", (e) => {
  const repo = repoPath();
  if (!repo) return;
  runControl(e.currentTarget, {
    request: () => api("/api/stage", { repoPath: repo, files: ["*"] }),
    after: refreshStatus,
  });
});

$("commit").addEventListener("click", (e) => {
  const repo = repoPath();
  if (!repo) return;
  const message = $("commitMessage").value;
  if (!message.trim()) { toast("Please enter a commit message", "error"); return; }
  runControl(e.currentTarget, {
    request: () => api("/api/commit", { repoPath: repo, message }),
    after: async () => { $("commitMessage").value = ""; await refreshAll(); },
  });
});

for (const op of ["push", "pull"]) {
  $(op).addEventListener("click", (e) => {
    const repo = repoPath();
    if (!repo) return;
    runControl(e.currentTarget, {
      request: () => api("/api/" + op, { repoPath: repo }),
      after: op === "pull" ? refreshAll : null,
    });
  });
}

$("createBranch").addEventListener("click", (e) => {
  const repo = repoPath();
  if (!repo) return;
  const branchName = $("newBranchName").value.trim();
  if (!branchName) { toast("Please enter a branch name", "error"); return; }
  runControl(e.currentTarget, {
    request: () => api("/api/branch/create", { repoPath: repo, branchName }),
    after: async () => { $("newBranchName").value = ""; await refreshStatus(); },
  });
});

for (const [id, op, refresh] of [["switchBranch", "switch", refreshAll], ["mergeBranch", "merge", refreshAll]]) {
  $(id).addEventListener("click", (e) => {
    const repo = repoPath();
    if (!repo) return;
    const branchName = $("branchSelect").value;
    if (!branchName) { toast("Please select a branch", "error"); return; }
    runControl(e.currentTarget, {
      request: () => api("/api/branch/" + op, { repoPath: repo, branchName }),
      after: refresh,
    });
  });
}

$("flowInit").addEventListener("click", (e) => {
  const repo = repoPath();
  if (!repo) return;
  runControl(e.currentTarget, {
    request: () => api("/api/flow/init", { repoPath: repo }),
    after: refreshStatus,
  });
});

$("flowStart").addEventListener("click", (e) => {
  const repo = repoPath();
  if (!repo) return;
  const kind = $("flowKind").value;
  const name = $("flowName").value.trim();
  const version = $("flowVersion").value.trim();
  if (!/^[a-z0-9-]+$/.test(name)) { toast("Invalid branch name. Use lowercase letters, numbers, and hyphens only", "error"); return; }
  if (kind !== "feature" && !/^\d+\.\d+\.\d+$/.test(version)) { toast("Invalid version number. Use semantic versioning (e.g., 1.0.0)", "error"); return; }
  runControl(e.currentTarget, {
    request: () => api("/api/flow/start", { repoPath: repo, kind, name, version: version || null }),
    after: refreshStatus,
  });
});

$("commitList").addEventListener("change", async (e) => {
  const select = e.target.closest("select.revert-type");
  if (!select || !select.value) return;
  const option = select.selectedOptions[0];
  const kind = select.value;
  const item = select.closest(".commit-item");
  const hash = item.dataset.hash;
  const repo = repoPath();
  if (!repo || !window.confirm(option.dataset.confirm)) { select.value = ""; return; }

  let request;
  if (kind === "revert") {
    request = () => api("/api/revert", { repoPath: repo, hash });
  } else if (kind.startsWith("reset-")) {
    request = () => api("/api/git-action", { repoPath: repo, action: "reset", params: { hash, mode: kind.slice(6) } });
  } else if (kind === "checkout") {
    request = () => api("/api/git-action", { repoPath: repo, action: "checkout", params: [hash] });
  } else {
    request = () => api("/api/git-action", { repoPath: repo, action: "drop", params: { hash } });
  }

  select.disabled = true;
  item.classList.add("loading");
  try {
    await request();
    toast(kind.replace("-", " ") + " operation completed successfully", "success");
    await refreshAll();
  } catch (err) {
    toast(err.message, "error");
  } finally {
    select.disabled = false;
    item.classList.remove("loading");
    select.value = "";
  }
});

if ($("repoPath").value.trim()) refreshAll();
</script>
</body>
</html>
"##;

/// Render the shell with `repo_path` prefilled.
pub fn render_page(repo_path: Option<&str>, page_size: usize) -> String {
    TEMPLATE
        .replace("__REPO_PATH__", &escape(repo_path.unwrap_or_default()))
        .replace("__PAGE_SIZE__", &page_size.max(1).to_string())
        .replace("__SCROLL_THRESHOLD__", &SCROLL_THRESHOLD_PX.to_string())
        .replace("__TOAST_MS__", &TOAST_MS.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_are_substituted() {
        let page = render_page(None, 50);
        assert!(page.contains("const PAGE_SIZE = 50;"));
        assert!(page.contains("const SCROLL_THRESHOLD_PX = 100;"));
        assert!(page.contains("const TOAST_MS = 3000;"));
        assert!(!page.contains("__"));
    }

    #[test]
    fn repo_path_is_escaped() {
        let page = render_page(Some(r#"/tmp/"><script>x</script>"#), 50);
        assert!(page.contains(r#"value="/tmp/&quot;&gt;&lt;script&gt;x&lt;/script&gt;""#));
    }

    #[test]
    fn client_guards_present() {
        let page = render_page(None, 50);
        assert!(page.contains("Please enter a commit message"));
        assert!(page.contains("Please enter a repository path"));
        assert!(page.contains("Please select files to stage"));
        assert!(page.contains("Please enter a branch name"));
    }
}
