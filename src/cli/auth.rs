use crate::remote;

pub async fn auth() {
    remote::auth::auth().await;
}
