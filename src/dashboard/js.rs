//! Dashboard JavaScript
//!
//! Progressive enhancement only; every action also works as a plain form post:
//! - Expand / collapse daily PnL tables
//! - Confirmation before destructive form posts
//! - Select-all toggle and selected count for strategy legs

pub const SCRIPT: &str = r#"
// ============================================================================
// PnL tables
// ============================================================================
function toggleDetailedTable(id) {
    const table = document.getElementById(id);
    const text = document.getElementById('btn-text-' + id);
    const icon = document.getElementById('icon-' + id);
    if (!table) return;

    const hidden = table.style.display === 'none';
    table.style.display = hidden ? 'block' : 'none';
    if (text) text.textContent = hidden ? '📊 Collapse Daily Details' : '📊 Expand Daily Details';
    if (icon) icon.textContent = hidden ? '▲' : '▼';
}

// ============================================================================
// Destructive actions
// ============================================================================
document.querySelectorAll('form[data-confirm]').forEach(form => {
    form.addEventListener('submit', e => {
        if (!confirm(form.dataset.confirm)) e.preventDefault();
    });
});

// ============================================================================
// Strategy legs
// ============================================================================
function updateTradeCount() {
    const counter = document.getElementById('trade-count');
    if (!counter) return;
    const n = document.querySelectorAll('.trade-row input[name^="trade_selected_"]:checked').length;
    counter.textContent = n + ' trade' + (n !== 1 ? 's' : '') + ' selected';
}

const selectAll = document.getElementById('select-all-trades');
if (selectAll) {
    selectAll.addEventListener('change', () => {
        document.querySelectorAll('input[name^="trade_selected_"]').forEach(box => {
            box.checked = selectAll.checked;
        });
        updateTradeCount();
    });
}

document.querySelectorAll('input[name^="trade_selected_"]').forEach(box => {
    box.addEventListener('change', updateTradeCount);
});
"#;
