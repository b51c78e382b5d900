//! Dashboard CSS styles
//!
//! Contains all styling for the options dashboard UI.
//! Uses CSS custom properties (variables) for theming.

pub const STYLES: &str = r"
* { box-sizing: border-box; margin: 0; padding: 0; }

:root {
    --bg: #0d1117;
    --card: #161b22;
    --border: #30363d;
    --text: #c9d1d9;
    --text-dim: #8b949e;
    --green: #3fb950;
    --red: #f85149;
    --blue: #58a6ff;
    --yellow: #d29922;
    --purple: #a371f7;
}

body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    background: var(--bg);
    color: var(--text);
    padding: 20px;
    min-height: 100vh;
}

.container { max-width: 1200px; margin: 0 auto; }

/* Header */
header {
    display: flex;
    justify-content: space-between;
    align-items: center;
    margin-bottom: 24px;
    padding-bottom: 16px;
    border-bottom: 1px solid var(--border);
}

h1 { font-size: 24px; font-weight: 600; }
h3 { font-size: 18px; margin-bottom: 16px; }
h4 { font-size: 15px; margin: 12px 0 8px; }

nav { display: flex; flex-wrap: wrap; gap: 8px; align-items: center; }
nav a {
    color: var(--text-dim);
    text-decoration: none;
    font-size: 13px;
    padding: 6px 10px;
    border-radius: 6px;
}
nav a:hover { background: var(--border); color: var(--text); }

/* Buttons */
.btn, button {
    padding: 8px 16px;
    border-radius: 6px;
    border: none;
    font-size: 13px;
    font-weight: 500;
    cursor: pointer;
    transition: all 0.2s;
    background: var(--blue);
    color: #fff;
}

.btn-secondary { background: var(--border); color: var(--text); }
.btn-secondary:hover { background: #3d444d; }
.btn-danger, .delete-btn { background: rgba(248, 81, 73, 0.2); color: var(--red); }

/* Cards */
.card {
    background: var(--card);
    border: 1px solid var(--border);
    border-radius: 12px;
    padding: 20px;
    margin-bottom: 16px;
}

.grid {
    display: grid;
    grid-template-columns: repeat(auto-fit, minmax(220px, 1fr));
    gap: 16px;
}

.tool-link {
    display: block;
    padding: 16px;
    border-radius: 8px;
    background: rgba(88, 166, 255, 0.1);
    color: var(--blue);
    text-decoration: none;
    font-weight: 600;
}

/* Forms */
form.tool-form { display: flex; flex-direction: column; gap: 12px; max-width: 480px; }
.form-group { display: flex; flex-direction: column; gap: 4px; }
label { font-size: 12px; color: var(--text-dim); text-transform: uppercase; }

input, select {
    padding: 8px 10px;
    border-radius: 6px;
    border: 1px solid var(--border);
    background: var(--bg);
    color: var(--text);
    font-size: 14px;
}

.checkbox-group { flex-direction: row; align-items: center; gap: 8px; }

/* Messages */
.error { color: var(--red); }
.notice {
    background: rgba(63, 185, 80, 0.15);
    color: var(--green);
    border-radius: 8px;
    padding: 10px 14px;
    margin-bottom: 16px;
}
.flash-error {
    background: rgba(248, 81, 73, 0.15);
    border-radius: 8px;
    padding: 10px 14px;
    margin-bottom: 16px;
}
.empty-state { padding: 20px; text-align: center; }

pre {
    background: var(--bg);
    border: 1px solid var(--border);
    border-radius: 8px;
    padding: 12px;
    overflow-x: auto;
    font-size: 12px;
}

/* Colors */
.profit, .pnl-profit { color: var(--green); }
.loss, .pnl-loss { color: var(--red); }
.neutral, .pnl-neutral { color: var(--text-dim); }

/* Strike cards */
.date-header {
    font-weight: 600;
    color: var(--purple);
    margin: 20px 0 8px;
}

.strike-card {
    background: var(--card);
    border: 1px solid var(--border);
    border-radius: 12px;
    margin-bottom: 16px;
    overflow: hidden;
}

.strike-card-header {
    display: flex;
    flex-wrap: wrap;
    gap: 20px;
    padding: 12px 20px;
    border-bottom: 1px solid var(--border);
    font-size: 13px;
}

.strike-card-body { display: grid; grid-template-columns: repeat(auto-fit, minmax(300px, 1fr)); }
.strike-card-section { padding: 16px 20px; }
.section-title { font-size: 12px; color: var(--text-dim); text-transform: uppercase; margin-bottom: 10px; }

.metric-row, .strike-row {
    display: flex;
    justify-content: space-between;
    gap: 12px;
    padding: 4px 0;
    font-size: 13px;
}

.strike-label { color: var(--text-dim); }

/* PnL */
.pnl-overview { display: flex; flex-wrap: wrap; gap: 16px; margin-bottom: 16px; }
.pnl-metric {
    flex: 1;
    min-width: 140px;
    display: flex;
    flex-direction: column;
    gap: 4px;
    background: rgba(255, 255, 255, 0.03);
    border-radius: 8px;
    padding: 12px;
}
.pnl-label { font-size: 11px; color: var(--text-dim); text-transform: uppercase; }
.pnl-value { font-size: 18px; font-weight: 600; }
.pnl-date { font-size: 12px; color: var(--text-dim); }

.position-summary-row {
    display: flex;
    justify-content: space-between;
    padding: 6px 0;
    border-bottom: 1px solid var(--border);
    font-size: 13px;
}
.position-price-qty { display: flex; gap: 12px; color: var(--text-dim); }

.expand-details-btn { margin: 12px 0; background: var(--border); color: var(--text); }

.detailed-pnl-table, .legs-table, .positions-table { width: 100%; border-collapse: collapse; margin-top: 12px; }

.detailed-pnl-table th, .detailed-pnl-table td,
.legs-table th, .legs-table td {
    text-align: left;
    padding: 8px;
    border-bottom: 1px solid var(--border);
    font-size: 12px;
}

.detailed-pnl-table th, .legs-table th {
    color: var(--text-dim);
    font-weight: 500;
    text-transform: uppercase;
}

.max-pnl-row { background: rgba(210, 153, 34, 0.15); }

/* Transactions */
.transaction-item {
    display: flex;
    justify-content: space-between;
    align-items: center;
    gap: 16px;
    padding: 12px 0;
    border-bottom: 1px solid var(--border);
}
.transaction-details { display: flex; flex-wrap: wrap; gap: 20px; }
.transaction-field .label { font-size: 11px; color: var(--text-dim); text-transform: uppercase; }
.transaction-field .value { font-size: 14px; font-weight: 500; }
.option-type.CE { color: var(--green); }
.option-type.PE { color: var(--red); }
.no-transactions { color: var(--text-dim); padding: 20px 0; text-align: center; }

/* Leg builder */
.trades-table { display: flex; flex-direction: column; gap: 6px; margin: 12px 0; }
.trade-row, .table-header {
    display: grid;
    grid-template-columns: 32px 80px 150px 200px 80px 90px 110px 48px;
    gap: 8px;
    align-items: center;
}
.table-header { font-size: 11px; color: var(--text-dim); text-transform: uppercase; }
.strike-controls { display: flex; gap: 4px; }
.strike-controls input { width: 110px; }
.strike-btn { padding: 6px 10px; background: var(--border); color: var(--text); }
.action-buttons { display: flex; gap: 8px; }
.default-submit { position: absolute; left: -9999px; width: 1px; height: 1px; overflow: hidden; }

.payoff-chart-container { margin-top: 16px; }
.payoff-chart { max-width: 100%; height: auto; background: #fff; border-radius: 8px; }

/* Responsive */
@media (max-width: 600px) {
    header { flex-direction: column; gap: 12px; }
    .trade-row, .table-header { grid-template-columns: 1fr 1fr; }
}
";
