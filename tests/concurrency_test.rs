//! Integration tests with overlapping transactions on an on-disk database.

mod helpers;

use folderhub_core::error::ErrorKind;
use folderhub_entity::folder::UpdateFolder;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_of_same_name() {
    let dir = tempfile::tempdir().expect("tempdir");
    let hub = helpers::file_backed_hub(&dir).await;
    let (user, home) = helpers::user(&hub, "racer").await;
    let (user_id, home_id) = (user.id, home.id);

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let hub = hub.clone();
            tokio::spawn(async move { hub.folders.create_folder("Same", user_id, home_id).await })
        })
        .collect();

    let mut created = 0;
    let mut conflicts = 0;
    for task in tasks {
        match task.await.expect("join") {
            Ok(_) => created += 1,
            Err(e) if e.is(ErrorKind::Conflict) => conflicts += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!((created, conflicts), (1, 7));
    assert_eq!(hub.folders.list_contents(home.id).await.expect("ls").folders.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_crossing_moves_cannot_form_a_cycle() {
    let dir = tempfile::tempdir().expect("tempdir");
    let hub = helpers::file_backed_hub(&dir).await;
    let (user, home) = helpers::user(&hub, "mover").await;
    let a = hub.folders.create_folder("A", user.id, home.id).await.expect("a");
    let b = hub.folders.create_folder("B", user.id, home.id).await.expect("b");
    let (a_id, b_id) = (a.id, b.id);

    let a_under_b = {
        let hub = hub.clone();
        tokio::spawn(async move {
            hub.folders
                .update_folder(a_id, &UpdateFolder::move_to(b_id))
                .await
        })
    };
    let b_under_a = {
        let hub = hub.clone();
        tokio::spawn(async move {
            hub.folders
                .update_folder(b_id, &UpdateFolder::move_to(a_id))
                .await
        })
    };

    let results = [
        a_under_b.await.expect("join"),
        b_under_a.await.expect("join"),
    ];
    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(succeeded, 1);
    for result in &results {
        if let Err(e) = result {
            assert!(e.is(ErrorKind::CycleRejected), "unexpected error: {e}");
        }
    }

    // Whatever won, the tree is still rooted at home.
    let below_home = hub.tree.descendants(home.id).await.expect("descendants");
    assert!(below_home.contains(&a.id) && below_home.contains(&b.id));
    assert!(!hub.tree.descendants(a.id).await.expect("a").contains(&a.id));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_user_creation() {
    let dir = tempfile::tempdir().expect("tempdir");
    let hub = helpers::file_backed_hub(&dir).await;

    let tasks: Vec<_> = (0..6)
        .map(|i| {
            let hub = hub.clone();
            let name = if i % 2 == 0 { "shared" } else { "SHARED" };
            tokio::spawn(async move { hub.users.create_user(name, "pw").await })
        })
        .collect();

    let mut winners = Vec::new();
    for task in tasks {
        match task.await.expect("join") {
            Ok((user, home)) => winners.push((user, home)),
            Err(e) => assert!(e.is(ErrorKind::Conflict), "unexpected error: {e}"),
        }
    }
    assert_eq!(winners.len(), 1);
    let (user, home) = &winners[0];
    assert_eq!(hub.identity.resolve_home_folder(user.id).await.expect("home"), home.id);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_independent_creates_all_succeed() {
    let dir = tempfile::tempdir().expect("tempdir");
    let hub = helpers::file_backed_hub(&dir).await;
    let (user, home) = helpers::user(&hub, "busy").await;
    let (user_id, home_id) = (user.id, home.id);

    let tasks: Vec<_> = (0..24)
        .map(|i| {
            let hub = hub.clone();
            tokio::spawn(async move {
                hub.folders
                    .create_folder(&format!("folder-{i}"), user_id, home_id)
                    .await
            })
        })
        .collect();

    for task in tasks {
        task.await.expect("join").expect("distinct names never conflict");
    }
    assert_eq!(hub.folders.list_contents(home.id).await.expect("ls").folders.len(), 24);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_creates_racing_parent_delete_leave_no_orphans() {
    let dir = tempfile::tempdir().expect("tempdir");
    let hub = helpers::file_backed_hub(&dir).await;
    let (user, home) = helpers::user(&hub, "reaper").await;
    let user_id = user.id;

    for round in 0..10 {
        let doomed = hub
            .folders
            .create_folder(&format!("doomed-{round}"), user.id, home.id)
            .await
            .expect("doomed");
        let doomed_id = doomed.id;

        let mut creates = Vec::new();
        for i in 0..5 {
            let hub = hub.clone();
            creates.push(tokio::spawn(async move {
                if i % 2 == 0 {
                    hub.folders
                        .create_folder(&format!("child-{i}"), user_id, doomed_id)
                        .await
                        .map(|_| ())
                } else {
                    hub.files
                        .create_file(&format!("file-{i}"), "blobs/x", doomed_id, 1)
                        .await
                        .map(|_| ())
                }
            }));
        }
        let delete = {
            let hub = hub.clone();
            tokio::spawn(async move { hub.folders.delete_folder(doomed_id).await })
        };

        delete.await.expect("join").expect("delete");
        for create in creates {
            if let Err(e) = create.await.expect("join") {
                assert!(
                    e.is(ErrorKind::InvalidParent) || e.is(ErrorKind::NotFound),
                    "round {round}: unexpected error: {e}"
                );
            }
        }
    }

    let orphan_folders: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM folders c WHERE c.parent_id IS NOT NULL \
         AND NOT EXISTS (SELECT 1 FROM folders p WHERE p.id = c.parent_id)",
    )
    .fetch_one(hub.db().pool())
    .await
    .expect("orphan folders");
    let orphan_files: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM files f \
         WHERE NOT EXISTS (SELECT 1 FROM folders p WHERE p.id = f.folder_id)",
    )
    .fetch_one(hub.db().pool())
    .await
    .expect("orphan files");
    assert_eq!((orphan_folders, orphan_files), (0, 0));
    assert!(hub.folders.list_contents(home.id).await.expect("ls").folders.is_empty());
}
