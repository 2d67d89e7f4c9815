//! Dashboard HTML templates
//!
//! - `TEMPLATE`: header with refresh control and one tab per account
//! - `LOGIN_TEMPLATE`: password form posted to `/login`

pub const TEMPLATE: &str = r#"
    <div class="container">
        <header>
            <div>
                <h1 id="title">🐘 Hyperliquid Positions</h1>
                <span class="refresh-time" id="generatedAt">Loading...</span>
            </div>
            <div class="header-controls">
                <button class="btn btn-secondary" onclick="refreshAll()" id="refreshBtn">🔄 Refresh</button>
                <form method="post" action="/logout">
                    <button class="btn btn-secondary" type="submit">Log out</button>
                </form>
            </div>
        </header>

        <nav class="tabs" id="tabs"></nav>
        <div id="accounts">
            <div class="card"><span class="empty">Loading...</span></div>
        </div>
    </div>
"#;

pub const LOGIN_TEMPLATE: &str = r#"
    <div class="container">
        <div class="card login">
            <h2>🐘 Hyperliquid Positions</h2>
            <form method="post" action="/login">
                <label for="password">Password</label>
                <input type="password" id="password" name="password" autofocus required>
                <button class="btn btn-primary" type="submit">Enter</button>
            </form>
            {error}
        </div>
    </div>
"#;
