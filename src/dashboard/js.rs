//! Dashboard JavaScript
//!
//! Client-side logic for the positions dashboard:
//! - Loads the snapshot from `/api/accounts` once per page load
//! - Renders one tab per account (summary, perp table, spot table)
//! - Manual refresh button re-runs the whole load

pub const SCRIPT: &str = r#"
// ============================================================================
// State
// ============================================================================
let activeTab = 0;

// ============================================================================
// Helpers
// ============================================================================
function escapeHtml(value) {
    return String(value)
        .replace(/&/g, '&amp;')
        .replace(/</g, '&lt;')
        .replace(/>/g, '&gt;')
        .replace(/"/g, '&quot;');
}

function pnlClass(value) {
    if (typeof value !== 'string') return '';
    if (value.startsWith('-')) return 'negative';
    if (value === 'NaN' || value === '$0.00' || value === '0.00') return '';
    return 'positive';
}

// ============================================================================
// Rendering
// ============================================================================
function renderSummary(columns) {
    return '<div class="summary">' + columns.map(column =>
        '<div>' + column.map(m =>
            `<div class="metric"><span class="metric-label">${escapeHtml(m.label)}:</span> ${escapeHtml(m.value)}</div>`
        ).join('') + '</div>'
    ).join('') + '</div>';
}

function renderTable(table) {
    if (table.empty) {
        return `<div class="empty">${escapeHtml(table.empty)}</div>`;
    }
    // Only PnL-like columns are coloured by sign
    const signed = table.signed || [];
    const head = table.columns.map(c => `<th>${escapeHtml(c)}</th>`).join('');
    const body = table.rows.map(row =>
        '<tr>' + row.map((cell, i) => {
            const cls = signed.includes(i) ? pnlClass(cell) : '';
            return `<td class="${cls}">${escapeHtml(cell)}</td>`;
        }).join('') + '</tr>'
    ).join('');
    return `<h3>${escapeHtml(table.title)}</h3>
        <table class="data-table"><thead><tr>${head}</tr></thead><tbody>${body}</tbody></table>`;
}

function renderAccount(account) {
    return `<div class="card">
        <h2>${escapeHtml(account.label)}</h2>
        ${renderSummary(account.summary)}
        ${renderTable(account.perp)}
        ${renderTable(account.spot)}
    </div>`;
}

function showTab(index) {
    activeTab = index;
    document.querySelectorAll('.tab').forEach((tab, i) => {
        tab.classList.toggle('active', i === index);
    });
    document.querySelectorAll('.account').forEach((panel, i) => {
        panel.style.display = i === index ? 'block' : 'none';
    });
}

function renderSnapshot(snapshot) {
    document.getElementById('generatedAt').textContent = snapshot.generated_at;
    if (activeTab >= snapshot.accounts.length) activeTab = 0;

    document.getElementById('tabs').innerHTML = snapshot.accounts.map((account, i) =>
        `<button class="tab" onclick="showTab(${i})">${escapeHtml(account.label)}</button>`
    ).join('');
    document.getElementById('accounts').innerHTML = snapshot.accounts.map(account =>
        `<div class="account">${renderAccount(account)}</div>`
    ).join('');

    showTab(activeTab);
}

function renderError(message) {
    document.getElementById('tabs').innerHTML = '';
    document.getElementById('accounts').innerHTML =
        `<div class="card"><span class="error">❌ ${escapeHtml(message)}</span></div>`;
}

// ============================================================================
// Loading
// ============================================================================
async function loadAccounts() {
    try {
        const res = await fetch('/api/accounts', { credentials: 'same-origin' });
        if (res.status === 401) {
            window.location.href = '/';
            return;
        }
        const data = await res.json();
        if (data.error) {
            renderError(data.message || 'Failed to load accounts');
        } else {
            renderSnapshot(data);
        }
    } catch (e) {
        renderError(e.message);
    }
}

async function refreshAll() {
    const btn = document.getElementById('refreshBtn');
    btn.disabled = true;
    btn.textContent = '⏳';

    await loadAccounts();

    btn.disabled = false;
    btn.textContent = '🔄 Refresh';
}

// ============================================================================
// Initialization
// ============================================================================
loadAccounts();
"#;
