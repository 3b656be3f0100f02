pub fn render_index() -> &'static str {
    INDEX_HTML
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Group Fitness Tracker</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&display=swap');

    :root {
      --bg-1: #eef6f1;
      --bg-2: #cdeedd;
      --ink: #24312a;
      --accent: #ff6b4a;
      --accent-2: #2f5d50;
      --card: rgba(255, 255, 255, 0.88);
      --shadow: 0 24px 60px rgba(47, 93, 80, 0.16);
    }

    * { box-sizing: border-box; }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #e4f3ec 60%, #f2f8f4 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(760px, 100%);
      background: var(--card);
      border-radius: 24px;
      box-shadow: var(--shadow);
      padding: 32px;
      display: grid;
      gap: 24px;
    }

    h1 { margin: 0; font-size: clamp(1.8rem, 4vw, 2.4rem); }
    .subtitle { margin: 0; color: #5d6a62; }

    .leaderboard { display: grid; gap: 10px; }

    .row {
      display: flex;
      align-items: center;
      justify-content: space-between;
      background: white;
      border: 1px solid rgba(47, 93, 80, 0.1);
      border-radius: 14px;
      padding: 12px 16px;
    }

    .row .name { font-weight: 600; }
    .row .meta { color: #7a847d; font-size: 0.85rem; }
    .row .streak { font-weight: 600; color: var(--accent); }

    form {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(140px, 1fr));
      gap: 10px;
      align-items: end;
    }

    label { display: grid; gap: 4px; font-size: 0.85rem; color: #5d6a62; }

    input, select {
      border: 1px solid rgba(47, 93, 80, 0.2);
      border-radius: 10px;
      padding: 10px;
      font: inherit;
    }

    button {
      border: none;
      border-radius: 999px;
      padding: 12px 18px;
      font: inherit;
      font-weight: 600;
      color: white;
      background: var(--accent);
      cursor: pointer;
    }

    .status { min-height: 1.2em; font-size: 0.95rem; color: #5d6a62; }
    .status[data-type="error"] { color: #c63b2b; }
    .status[data-type="ok"] { color: #2d7a4b; }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Group Fitness Tracker</h1>
      <p class="subtitle">Log an exercise, keep the streak alive.</p>
    </header>

    <section>
      <h2>Leaderboard</h2>
      <div class="leaderboard" id="leaderboard"></div>
    </section>

    <section>
      <h2>Quick log</h2>
      <form id="log-form">
        <label>Who
          <select id="user" required></select>
        </label>
        <label>Activity
          <select id="activity" required></select>
        </label>
        <label>Minutes
          <input id="duration" type="number" min="0" value="30" />
        </label>
        <button type="submit">Log it</button>
      </form>
      <div class="status" id="status"></div>
    </section>
  </main>

  <script>
    const leaderboardEl = document.getElementById('leaderboard');
    const userEl = document.getElementById('user');
    const activityEl = document.getElementById('activity');
    const durationEl = document.getElementById('duration');
    const statusEl = document.getElementById('status');

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const activityLabel = (entry) => {
      const parts = entry.split(':');
      return parts.length > 1 ? `${parts[0]} ${parts.slice(1).join(':')}` : entry;
    };

    const renderLeaderboard = (users) => {
      if (!users.length) {
        leaderboardEl.innerHTML = '<div class="row"><span class="meta">No one yet.</span></div>';
        return;
      }
      leaderboardEl.innerHTML = users
        .map((user) => `
          <div class="row">
            <div>
              <div class="name">${user.name}</div>
              <div class="meta">${user.total_exercises} workouts · best ${user.longest_streak}</div>
            </div>
            <div class="streak">${user.current_streak > 0 ? '🔥 ' + user.current_streak : '–'}</div>
          </div>`)
        .join('');
    };

    const loadUsers = async () => {
      const res = await fetch('/api/users');
      if (!res.ok) throw new Error('Unable to load users');
      const users = await res.json();
      renderLeaderboard(users);
      userEl.innerHTML = users
        .map((user) => `<option value="${user.id}">${user.name}</option>`)
        .join('');
    };

    const loadActivities = async () => {
      const res = await fetch('/api/settings');
      if (!res.ok) throw new Error('Unable to load settings');
      const settings = await res.json();
      activityEl.innerHTML = settings.activities
        .map((entry) => `<option value="${entry}">${activityLabel(entry)}</option>`)
        .join('');
    };

    document.getElementById('log-form').addEventListener('submit', async (event) => {
      event.preventDefault();
      setStatus('Saving...', '');
      try {
        const res = await fetch('/api/exercises', {
          method: 'POST',
          headers: { 'content-type': 'application/json' },
          body: JSON.stringify({
            user_id: Number(userEl.value),
            activity: activityEl.value,
            duration: Number(durationEl.value) || 0
          })
        });
        if (!res.ok) throw new Error(await res.text() || 'Request failed');
        await loadUsers();
        setStatus('Logged!', 'ok');
        setTimeout(() => setStatus('', ''), 1500);
      } catch (err) {
        setStatus(err.message, 'error');
      }
    });

    Promise.all([loadUsers(), loadActivities()]).catch((err) => setStatus(err.message, 'error'));
  </script>
</body>
</html>
"#;
