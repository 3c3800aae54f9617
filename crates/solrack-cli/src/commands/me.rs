/*!
 * `me` command: identity of the logged-in user
 */

use anyhow::Result;

use super::{connect, disconnect, ConnectionArgs};

pub async fn show(conn: &ConnectionArgs) -> Result<()> {
    let mut client = connect(conn).await?;
    let result = client.me().await;
    disconnect(&mut client).await;

    let me = result?;
    println!("{}", serde_json::to_string_pretty(&me)?);
    Ok(())
}
